//! Pub/Sub channel naming.

use folio_core::TargetId;

/// Every domain event is published here
pub const EVENTS_CHANNEL: &str = "folio:events";
/// Per-target channels, `folio:target:{target_id}`
pub const TARGET_CHANNEL_PREFIX: &str = "folio:target:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// All events from all instances
    Events,
    /// Events touching one target
    Target(TargetId),
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn events() -> Self {
        Self::Events
    }

    #[must_use]
    pub fn target(target_id: TargetId) -> Self {
        Self::Target(target_id)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Events => EVENTS_CHANNEL.to_string(),
            Self::Target(id) => format!("{TARGET_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Inverse of [`name`](Self::name); anything unrecognised is `Custom`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == EVENTS_CHANNEL {
            return Self::Events;
        }

        if let Some(raw) = name.strip_prefix(TARGET_CHANNEL_PREFIX) {
            if let Ok(id) = TargetId::parse(raw) {
                return Self::Target(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        let target = TargetId::parse("article-42").unwrap();

        assert_eq!(PubSubChannel::events().name(), "folio:events");
        assert_eq!(PubSubChannel::target(target).name(), "folio:target:article-42");
        assert_eq!(PubSubChannel::custom("ops").name(), "ops");
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(PubSubChannel::parse("folio:events"), PubSubChannel::Events);
        assert_eq!(
            PubSubChannel::parse("folio:target:article-42"),
            PubSubChannel::Target(TargetId::parse("article-42").unwrap())
        );
        assert_eq!(
            PubSubChannel::parse("folio:target:"),
            PubSubChannel::Custom("folio:target:".to_string())
        );
        assert_eq!(
            PubSubChannel::parse("elsewhere"),
            PubSubChannel::Custom("elsewhere".to_string())
        );
    }
}
