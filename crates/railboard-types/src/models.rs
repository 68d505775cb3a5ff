use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields shared by every stored widget. Concrete widget kinds embed this
/// by composition (serde flatten), not inheritance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericWidget {
    /// Assigned by the persistence layer on first save; immutable and unique
    /// within its collection afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    /// Disabled widgets are excluded from active display but stay stored.
    pub enabled: bool,
}

/// A manually configured train entry on an arrival board. Owned by its
/// widget; no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTrain {
    pub text: String,
    /// Time of day ("HH:MM") this entry targets; drives ordering and
    /// highlighting against live arrivals.
    pub target_time: String,
    pub color: String,
    /// When false the entry is withheld until it fits on screen without
    /// displacing naturally occurring arrivals (rendering policy only).
    pub show_always: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainArrivalWidget {
    #[serde(flatten)]
    pub widget: GenericWidget,
    /// Code into the station directory (see [`crate::stations`]).
    pub station_id: String,
    /// Sequence order is display order; an empty list is valid.
    #[serde(default)]
    pub custom_trains: Vec<CustomTrain>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    #[serde(flatten)]
    pub widget: GenericWidget,
    pub text: String,
}

/// The closed set of widget kinds, tagged on the wire by `kind`.
///
/// Unknown extra fields inside a kind are tolerated on deserialization for
/// forward compatibility; known fields are type-checked by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Widget {
    #[serde(rename = "DCMetroTrainArrivalWidget")]
    TrainArrival(TrainArrivalWidget),
    #[serde(rename = "AlertMessage")]
    Alert(AlertMessage),
}

impl Widget {
    /// The wire tag for this widget's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TrainArrival(_) => "DCMetroTrainArrivalWidget",
            Self::Alert(_) => "AlertMessage",
        }
    }

    pub fn generic(&self) -> &GenericWidget {
        match self {
            Self::TrainArrival(w) => &w.widget,
            Self::Alert(w) => &w.widget,
        }
    }

    pub fn generic_mut(&mut self) -> &mut GenericWidget {
        match self {
            Self::TrainArrival(w) => &mut w.widget,
            Self::Alert(w) => &mut w.widget,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.generic().id
    }

    pub fn name(&self) -> &str {
        &self.generic().name
    }

    pub fn enabled(&self) -> bool {
        self.generic().enabled
    }

    /// Structural validation. Collects every failing field rather than
    /// stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if self.generic().name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be empty"));
        }

        match self {
            Self::TrainArrival(w) => {
                if w.station_id.trim().is_empty() {
                    errors.push(FieldError::new("station_id", "must not be empty"));
                }
                for (i, train) in w.custom_trains.iter().enumerate() {
                    if train.text.trim().is_empty() {
                        errors.push(FieldError::new(
                            format!("custom_trains[{i}].text"),
                            "must not be empty",
                        ));
                    }
                    if NaiveTime::parse_from_str(&train.target_time, "%H:%M").is_err() {
                        errors.push(FieldError::new(
                            format!("custom_trains[{i}].target_time"),
                            "must be a time of day in HH:MM form",
                        ));
                    }
                    if train.color.trim().is_empty() {
                        errors.push(FieldError::new(
                            format!("custom_trains[{i}].color"),
                            "must not be empty",
                        ));
                    }
                }
            }
            Self::Alert(w) => {
                if w.text.trim().is_empty() {
                    errors.push(FieldError::new("text", "must not be empty"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

/// A single failing field in a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Names of the failing fields, for quick matching in callers and tests.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(name: &str, station_id: &str, trains: Vec<CustomTrain>) -> Widget {
        Widget::TrainArrival(TrainArrivalWidget {
            widget: GenericWidget {
                id: None,
                name: name.to_string(),
                enabled: true,
            },
            station_id: station_id.to_string(),
            custom_trains: trains,
        })
    }

    #[test]
    fn empty_name_is_rejected() {
        let w = Widget::Alert(AlertMessage {
            widget: GenericWidget {
                id: None,
                name: String::new(),
                enabled: true,
            },
            text: "Track work this weekend".to_string(),
        });
        let errors = w.validate().unwrap_err();
        assert!(errors.fields().contains(&"name"));
    }

    #[test]
    fn empty_custom_trains_is_valid() {
        assert!(arrival("Board", "A01", vec![]).validate().is_ok());
    }

    #[test]
    fn all_failing_fields_are_enumerated() {
        let w = arrival(
            "",
            "",
            vec![CustomTrain {
                text: String::new(),
                target_time: "25:99".to_string(),
                color: "blue".to_string(),
                show_always: true,
            }],
        );
        let errors = w.validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                "name",
                "station_id",
                "custom_trains[0].text",
                "custom_trains[0].target_time",
            ]
        );
    }

    #[test]
    fn target_time_must_be_time_of_day() {
        let w = arrival(
            "Board",
            "A01",
            vec![CustomTrain {
                text: "School train".to_string(),
                target_time: "soon".to_string(),
                color: "red".to_string(),
                show_always: false,
            }],
        );
        let errors = w.validate().unwrap_err();
        assert_eq!(errors.fields(), vec!["custom_trains[0].target_time"]);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let json = serde_json::json!({
            "kind": "AlertMessage",
            "name": "Alerts",
            "enabled": true,
            "text": "Single tracking",
            "legacy_field": 42,
        });
        let w: Widget = serde_json::from_value(json).unwrap();
        assert_eq!(w.name(), "Alerts");
        assert!(w.validate().is_ok());
    }

    #[test]
    fn known_fields_are_type_checked() {
        let json = serde_json::json!({
            "kind": "AlertMessage",
            "name": "Alerts",
            "enabled": "yes",
            "text": "Single tracking",
        });
        assert!(serde_json::from_value::<Widget>(json).is_err());
    }

    #[test]
    fn id_survives_a_round_trip() {
        let mut w = arrival("Board", "A01", vec![]);
        let id = uuid::Uuid::new_v4();
        w.generic_mut().id = Some(id);
        let json = serde_json::to_string(&w).unwrap();
        let back: Widget = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), Some(id));
    }
}
