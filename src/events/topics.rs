// ============================================================================
// TOPICS - `<action>:<entity>:<verb>` names used on the event bus
// ============================================================================

/// Broadcast to every mounted list view
pub const REFRESH_DATA: &str = "refresh:data";

/// Payload of a drawer topic when the drawer should open on an empty record
pub const NEW_RECORD: &str = "new";

/// The three topics an entity workflow is wired through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicSet {
    /// Opens the editor drawer (payload: record or `NEW_RECORD`)
    pub drawer: &'static str,
    /// Opens the delete confirmation (payload: record)
    pub confirmation: &'static str,
    /// Tells the owning list view to re-fetch
    pub reload: &'static str,
}

pub const USERS: TopicSet = TopicSet {
    drawer: "drawer:users:edit",
    confirmation: "confirmation:users:delete",
    reload: "reload:users",
};

pub const BRANDS: TopicSet = TopicSet {
    drawer: "drawer:brands:edit",
    confirmation: "confirmation:brands:delete",
    reload: "reload:brands",
};

pub const LOCATIONS: TopicSet = TopicSet {
    drawer: "drawer:locations:edit",
    confirmation: "confirmation:locations:delete",
    reload: "reload:locations",
};

pub const LOOKS: TopicSet = TopicSet {
    drawer: "drawer:look:creator:edit",
    confirmation: "confirmation:looks:delete",
    reload: "reload:looks",
};

pub const BRAND_MEMBERS: TopicSet = TopicSet {
    drawer: "drawer:brand:members:edit",
    confirmation: "confirmation:brand:members:delete",
    reload: "reload:brand-members",
};

// Campaigns and ads share a reload topic: removing a campaign removes its ads
pub const BRAND_CAMPAIGNS: TopicSet = TopicSet {
    drawer: "drawer:brand:campaigns:edit",
    confirmation: "confirmation:brand:campaigns:delete",
    reload: "reload:brand-ads",
};

pub const BRAND_ADS: TopicSet = TopicSet {
    drawer: "drawer:brand:ads:edit",
    confirmation: "confirmation:brand:ads:delete",
    reload: "reload:brand-ads",
};

/// Whether a drawer payload asks for a new record
pub fn is_new_record(detail: &serde_json::Value) -> bool {
    detail.is_null() || detail.as_str() == Some(NEW_RECORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn topic_names_follow_the_action_entity_verb_convention() {
        for set in [USERS, BRANDS, LOCATIONS, LOOKS, BRAND_MEMBERS, BRAND_CAMPAIGNS, BRAND_ADS] {
            assert!(set.drawer.starts_with("drawer:"));
            assert!(set.confirmation.starts_with("confirmation:"));
            assert!(set.reload.starts_with("reload:"));
        }
    }

    #[test]
    fn new_sentinel_is_recognised() {
        assert!(is_new_record(&json!("new")));
        assert!(is_new_record(&serde_json::Value::Null));
        assert!(!is_new_record(&json!({"id": "1"})));
    }
}
