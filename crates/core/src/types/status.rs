//! Order lifecycle status and the volume-type discriminator.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an [`OrderStatus`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct StatusParseError(pub String);

/// Error returned when parsing a [`VolumeType`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid volume type: {0}")]
pub struct VolumeTypeParseError(pub String);

/// Order lifecycle status.
///
/// The variants form an ordered progression, but transitions are not
/// enforced: an operator may write any status at any time. `Ready` is the
/// only status with a side effect (latches the order's ready timestamp,
/// handled at the persistence layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Created,
    Processing,
    Assembling,
    Delivering,
    Ready,
}

impl OrderStatus {
    /// All statuses in lifecycle order, for filter dropdowns and admin lists.
    pub const ALL: [Self; 5] = [
        Self::Created,
        Self::Processing,
        Self::Assembling,
        Self::Delivering,
        Self::Ready,
    ];

    /// The stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Processing => "processing",
            Self::Assembling => "assembling",
            Self::Delivering => "delivering",
            Self::Ready => "ready",
        }
    }

    /// Human-readable display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Processing => "Processing",
            Self::Assembling => "Assembling",
            Self::Delivering => "Delivering",
            Self::Ready => "Ready",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "processing" => Ok(Self::Processing),
            "assembling" => Ok(Self::Assembling),
            "delivering" => Ok(Self::Delivering),
            "ready" => Ok(Self::Ready),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// Order volume type - the discriminator deciding which conditional fields
/// an order carries.
///
/// - `Single`: one item, described by free text.
/// - `Multiple`: many items, described by an uploaded document and a
///   quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeType {
    Single,
    Multiple,
}

impl VolumeType {
    /// Both volume types, for form dropdowns and admin filters.
    pub const ALL: [Self; 2] = [Self::Single, Self::Multiple];

    /// The stored string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }

    /// Human-readable display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Multiple => "Multiple",
        }
    }
}

impl std::fmt::Display for VolumeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VolumeType {
    type Err = VolumeTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            other => Err(VolumeTypeParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_invalid() {
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
        assert!("Ready".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_default_is_created() {
        assert_eq!(OrderStatus::default(), OrderStatus::Created);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(OrderStatus::Ready.label(), "Ready");
        assert_eq!(OrderStatus::Delivering.as_str(), "delivering");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_volume_type_roundtrip() {
        for vt in VolumeType::ALL {
            let parsed: VolumeType = vt.as_str().parse().unwrap();
            assert_eq!(parsed, vt);
        }
    }

    #[test]
    fn test_volume_type_invalid() {
        assert!("bulk".parse::<VolumeType>().is_err());
        assert!("".parse::<VolumeType>().is_err());
    }
}
