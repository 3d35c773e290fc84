//! Key builders for every cached entity view.

use uuid::Uuid;

use crate::{cache::QueryKey, dto::table::TableQuery};

const ANONYMOUS: &str = "anonymous";

fn viewer_part(viewer: Option<Uuid>) -> String {
    viewer.map_or_else(|| ANONYMOUS.to_string(), |id| id.to_string())
}

/// Every cached game view.
pub fn games() -> QueryKey {
    QueryKey::new("games")
}

/// Every cached view of a single game, whoever the viewer.
pub fn game(id: Uuid) -> QueryKey {
    games().push(id)
}

/// A single game as seen by `viewer` (registration flags are per user).
pub fn game_detail(id: Uuid, viewer: Option<Uuid>) -> QueryKey {
    game(id).push(viewer_part(viewer))
}

/// Every cached page of the games table.
pub fn game_lists() -> QueryKey {
    games().push("list")
}

/// One page of the games table as seen by `viewer`.
pub fn game_list(viewer: Option<Uuid>, query: &TableQuery) -> QueryKey {
    game_lists().push(viewer_part(viewer)).extend(query.key_parts())
}

/// Every cached member view.
pub fn members() -> QueryKey {
    QueryKey::new("members")
}

/// One page of the members table.
pub fn member_list(query: &TableQuery) -> QueryKey {
    members().push("list").extend(query.key_parts())
}

/// Every cached announcement view.
pub fn announcements() -> QueryKey {
    QueryKey::new("announcements")
}

/// One page of announcements visible to `viewer`.
pub fn announcement_list(viewer: Option<Uuid>, query: &TableQuery) -> QueryKey {
    announcements()
        .push("list")
        .push(viewer_part(viewer))
        .extend(query.key_parts())
}

/// Every cached invite view.
pub fn invites() -> QueryKey {
    QueryKey::new("invites")
}

/// One page of the invites table.
pub fn invite_list(query: &TableQuery) -> QueryKey {
    invites().push("list").extend(query.key_parts())
}

/// Every cached message view.
pub fn messages() -> QueryKey {
    QueryKey::new("messages")
}

/// Every cached page of `viewer`'s inbox.
pub fn inbox(viewer: Uuid) -> QueryKey {
    messages().push(viewer)
}

/// One page of `viewer`'s inbox.
pub fn message_list(viewer: Uuid, query: &TableQuery) -> QueryKey {
    inbox(viewer).extend(query.key_parts())
}
