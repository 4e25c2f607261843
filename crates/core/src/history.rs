//! Ticket snapshot diffing for the audit history.
//!
//! [`diff_tickets`] compares an old and new [`TicketSnapshot`] field by field
//! and produces one [`HistoryEntry`] per tracked field that changed, in a
//! fixed order (title, description, archived, type, status, priority,
//! developer). The caller supplies [`NameLookups`] so foreign-key changes are
//! recorded by display name; the diff never assumes related rows were loaded.
//!
//! Entries carry no timestamp or acting user -- the repository layer stamps
//! every entry of one invocation with a single UTC instant when persisting.

use std::collections::HashMap;

use crate::types::DbId;

/// Display fallback when an id is missing from a lookup map.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Display placeholder for a ticket with no assigned developer.
pub const UNASSIGNED: &str = "Unassigned";

/// Tracked-field property names stored in `ticket_histories.property_name`.
pub mod properties {
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
    pub const ARCHIVED: &str = "Archived";
    pub const TICKET_TYPE: &str = "TicketType";
    pub const TICKET_STATUS: &str = "TicketStatus";
    pub const TICKET_PRIORITY: &str = "TicketPriority";
    pub const DEVELOPER: &str = "Developer";
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The tracked fields of a ticket, captured before and after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSnapshot {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub archived: bool,
    pub ticket_type_id: DbId,
    pub ticket_status_id: DbId,
    pub ticket_priority_id: DbId,
    pub developer_user_id: Option<DbId>,
}

/// Resolved id -> display-name maps for the foreign-key fields of a ticket.
///
/// Passing these explicitly means the diff works on bare snapshots; a miss
/// resolves to [`UNKNOWN_NAME`] instead of faulting.
#[derive(Debug, Clone, Default)]
pub struct NameLookups {
    pub ticket_types: HashMap<DbId, String>,
    pub ticket_statuses: HashMap<DbId, String>,
    pub ticket_priorities: HashMap<DbId, String>,
    pub developers: HashMap<DbId, String>,
}

impl NameLookups {
    fn ticket_type(&self, id: DbId) -> &str {
        self.ticket_types.get(&id).map_or(UNKNOWN_NAME, |n| n)
    }

    fn ticket_status(&self, id: DbId) -> &str {
        self.ticket_statuses.get(&id).map_or(UNKNOWN_NAME, |n| n)
    }

    fn ticket_priority(&self, id: DbId) -> &str {
        self.ticket_priorities.get(&id).map_or(UNKNOWN_NAME, |n| n)
    }

    /// Developer display name, with [`UNASSIGNED`] for `None` and
    /// [`UNKNOWN_NAME`] for an id missing from the map.
    fn developer(&self, id: Option<DbId>) -> &str {
        match id {
            None => UNASSIGNED,
            Some(id) => self.developers.get(&id).map_or(UNKNOWN_NAME, |n| n),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One field-level change, ready to be persisted as a history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub ticket_id: DbId,
    pub property_name: String,
    pub old_value: String,
    pub new_value: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Diffing
// ---------------------------------------------------------------------------

/// Compare two ticket snapshots and describe every tracked-field change.
///
/// With `old` absent this is a creation: exactly one entry with empty
/// property/old/new values and the description `"New Ticket Created"`.
/// Otherwise one entry per changed field, in the fixed tracked-field order.
/// An update that touches no tracked field produces no entries.
pub fn diff_tickets(
    old: Option<&TicketSnapshot>,
    new: &TicketSnapshot,
    lookups: &NameLookups,
) -> Vec<HistoryEntry> {
    let Some(old) = old else {
        return vec![HistoryEntry {
            ticket_id: new.id,
            property_name: String::new(),
            old_value: String::new(),
            new_value: String::new(),
            description: "New Ticket Created".to_string(),
        }];
    };

    let mut entries = Vec::new();

    if old.title != new.title {
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::TITLE.to_string(),
            old_value: old.title.clone(),
            new_value: new.title.clone(),
            description: format!("Ticket title was changed to {}", new.title),
        });
    }

    if old.description != new.description {
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::DESCRIPTION.to_string(),
            old_value: old.description.clone(),
            new_value: new.description.clone(),
            description: format!("Ticket description was changed to {}", new.description),
        });
    }

    if old.archived != new.archived {
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::ARCHIVED.to_string(),
            old_value: old.archived.to_string(),
            new_value: new.archived.to_string(),
            description: if new.archived {
                "Ticket was archived".to_string()
            } else {
                "Ticket restored".to_string()
            },
        });
    }

    if old.ticket_type_id != new.ticket_type_id {
        let new_name = lookups.ticket_type(new.ticket_type_id);
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::TICKET_TYPE.to_string(),
            old_value: lookups.ticket_type(old.ticket_type_id).to_string(),
            new_value: new_name.to_string(),
            description: format!("Ticket type changed to {new_name}"),
        });
    }

    if old.ticket_status_id != new.ticket_status_id {
        let new_name = lookups.ticket_status(new.ticket_status_id);
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::TICKET_STATUS.to_string(),
            old_value: lookups.ticket_status(old.ticket_status_id).to_string(),
            new_value: new_name.to_string(),
            description: format!("Ticket status changed to {new_name}"),
        });
    }

    if old.ticket_priority_id != new.ticket_priority_id {
        let new_name = lookups.ticket_priority(new.ticket_priority_id);
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::TICKET_PRIORITY.to_string(),
            old_value: lookups.ticket_priority(old.ticket_priority_id).to_string(),
            new_value: new_name.to_string(),
            description: format!("Ticket priority changed to {new_name}"),
        });
    }

    if old.developer_user_id != new.developer_user_id {
        let new_name = lookups.developer(new.developer_user_id);
        entries.push(HistoryEntry {
            ticket_id: new.id,
            property_name: properties::DEVELOPER.to_string(),
            old_value: lookups.developer(old.developer_user_id).to_string(),
            new_value: new_name.to_string(),
            description: format!("Ticket developer assigned to {new_name}"),
        });
    }

    entries
}

// ---------------------------------------------------------------------------
// Sub-events
// ---------------------------------------------------------------------------

/// Audit description for a categorized sub-event (comment/attachment added).
///
/// The category label has the `Ticket` noise word stripped and is lowercased,
/// so `"TicketComment"` reads as `"New comment added to ticket: {title}"`.
pub fn sub_event_description(category: &str, ticket_title: &str) -> String {
    let kind = category.to_lowercase().replace("ticket", "");
    format!("New {kind} added to ticket: {ticket_title}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TicketSnapshot {
        TicketSnapshot {
            id: 10,
            title: "Login fails".to_string(),
            description: "Cannot log in with valid credentials".to_string(),
            archived: false,
            ticket_type_id: 1,
            ticket_status_id: 1,
            ticket_priority_id: 2,
            developer_user_id: None,
        }
    }

    fn lookups() -> NameLookups {
        NameLookups {
            ticket_types: HashMap::from([(1, "Defect".into()), (2, "Enhancement".into())]),
            ticket_statuses: HashMap::from([(1, "New".into()), (2, "Development".into())]),
            ticket_priorities: HashMap::from([(1, "Low".into()), (2, "Medium".into())]),
            developers: HashMap::from([(7, "Ada Lovelace".into())]),
        }
    }

    #[test]
    fn creation_emits_single_entry() {
        let new = snapshot();
        let entries = diff_tickets(None, &new, &lookups());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ticket_id, 10);
        assert_eq!(entries[0].property_name, "");
        assert_eq!(entries[0].old_value, "");
        assert_eq!(entries[0].new_value, "");
        assert_eq!(entries[0].description, "New Ticket Created");
    }

    #[test]
    fn identical_snapshots_emit_nothing() {
        let t = snapshot();
        assert!(diff_tickets(Some(&t), &t, &lookups()).is_empty());
    }

    #[test]
    fn title_and_status_change_in_order() {
        let old = snapshot();
        let mut new = snapshot();
        new.title = "Login fails on Safari".to_string();
        new.ticket_status_id = 2;

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].property_name, properties::TITLE);
        assert_eq!(entries[0].old_value, "Login fails");
        assert_eq!(entries[0].new_value, "Login fails on Safari");
        assert_eq!(
            entries[0].description,
            "Ticket title was changed to Login fails on Safari"
        );

        assert_eq!(entries[1].property_name, properties::TICKET_STATUS);
        assert_eq!(entries[1].old_value, "New");
        assert_eq!(entries[1].new_value, "Development");
        assert_eq!(entries[1].description, "Ticket status changed to Development");
    }

    #[test]
    fn archiving_uses_boolean_values_and_archived_wording() {
        let old = snapshot();
        let mut new = snapshot();
        new.archived = true;

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].property_name, properties::ARCHIVED);
        assert_eq!(entries[0].old_value, "false");
        assert_eq!(entries[0].new_value, "true");
        assert_eq!(entries[0].description, "Ticket was archived");
    }

    #[test]
    fn restoring_uses_restored_wording() {
        let mut old = snapshot();
        old.archived = true;
        let new = snapshot();

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].description, "Ticket restored");
    }

    #[test]
    fn assigning_developer_from_unassigned() {
        let old = snapshot();
        let mut new = snapshot();
        new.developer_user_id = Some(7);

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].property_name, properties::DEVELOPER);
        assert_eq!(entries[0].old_value, UNASSIGNED);
        assert_eq!(entries[0].new_value, "Ada Lovelace");
        assert_eq!(
            entries[0].description,
            "Ticket developer assigned to Ada Lovelace"
        );
    }

    #[test]
    fn unassigning_developer_records_placeholder() {
        let mut old = snapshot();
        old.developer_user_id = Some(7);
        let new = snapshot();

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].new_value, UNASSIGNED);
        assert_eq!(
            entries[0].description,
            "Ticket developer assigned to Unassigned"
        );
    }

    #[test]
    fn missing_lookup_falls_back_to_unknown() {
        let old = snapshot();
        let mut new = snapshot();
        new.ticket_type_id = 99;
        new.developer_user_id = Some(42);

        let entries = diff_tickets(Some(&old), &new, &lookups());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].new_value, UNKNOWN_NAME);
        assert_eq!(entries[0].description, "Ticket type changed to Unknown");
        assert_eq!(entries[1].new_value, UNKNOWN_NAME);
    }

    #[test]
    fn every_tracked_field_changed_emits_in_fixed_order() {
        let old = snapshot();
        let new = TicketSnapshot {
            id: 10,
            title: "T2".to_string(),
            description: "D2".to_string(),
            archived: true,
            ticket_type_id: 2,
            ticket_status_id: 2,
            ticket_priority_id: 1,
            developer_user_id: Some(7),
        };

        let props: Vec<_> = diff_tickets(Some(&old), &new, &lookups())
            .into_iter()
            .map(|e| e.property_name)
            .collect();
        assert_eq!(
            props,
            vec![
                properties::TITLE,
                properties::DESCRIPTION,
                properties::ARCHIVED,
                properties::TICKET_TYPE,
                properties::TICKET_STATUS,
                properties::TICKET_PRIORITY,
                properties::DEVELOPER,
            ]
        );
    }

    #[test]
    fn comment_sub_event_description() {
        assert_eq!(
            sub_event_description("TicketComment", "Login fails"),
            "New comment added to ticket: Login fails"
        );
    }

    #[test]
    fn attachment_sub_event_description() {
        assert_eq!(
            sub_event_description("TicketAttachment", "Login fails"),
            "New attachment added to ticket: Login fails"
        );
    }
}
