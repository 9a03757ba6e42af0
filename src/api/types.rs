use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Season {
    pub id: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// The standings endpoint is served in three known shapes. `Unrecognized`
/// must stay the last variant: it swallows everything the others don't.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StandingsResponse {
    Classification {
        classification: Vec<StandingsRow>,
        #[serde(default)]
        file: Option<String>,
        #[serde(default, rename = "xmlFile")]
        xml_file: Option<String>,
    },
    Items {
        items: Vec<StandingsRow>,
    },
    Bare(Vec<StandingsRow>),
    Unrecognized(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsRow {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub position: u32,
    #[serde(default)]
    pub rider: Option<RiderInfo>,
    #[serde(default)]
    pub team: Option<TeamInfo>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub points: i64,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub race_wins: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub podiums: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiderInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default)]
    pub country: Option<CountryInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub iso: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub country: Option<CountryInfo>,
    #[serde(default)]
    pub circuit: Option<CircuitInfo>,
}

impl ApiEvent {
    /// Some payloads key the identifier as `id`, others as `uuid`.
    pub fn event_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.uuid.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CircuitInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub place: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveTimingResponse {
    #[serde(default)]
    pub head: LiveHead,
    #[serde(default)]
    pub rider: HashMap<String, LiveRider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveHead {
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_status_name: String,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub num_laps: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveRider {
    #[serde(default, deserialize_with = "lenient_position")]
    pub pos: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rider_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rider_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rider_surname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rider_nation: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bike_name: String,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub num_lap: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gap_first: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_lap_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_name: String,
}

// The upstream API is loose about scalar types (numbers arrive as strings,
// strings as numbers, anything as null). These coercions keep a single bad
// field from discarding a whole response.

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value).unwrap_or(0))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0))
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value).and_then(|n| u32::try_from(n).ok()))
}

fn lenient_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn standings_classification_shape() {
        let raw = json!({
            "classification": [
                {"position": 1, "rider": {"full_name": "M. Marquez", "country": {"iso": "ES"}},
                 "team": {"name": "Ducati Lenovo Team"}, "points": 250, "race_wins": 9, "podiums": 12},
            ],
            "file": "standings.pdf",
            "xmlFile": "standings.xml",
        });
        match serde_json::from_value::<StandingsResponse>(raw).unwrap() {
            StandingsResponse::Classification {
                classification,
                file,
                xml_file,
            } => {
                assert_eq!(1, classification.len());
                assert_eq!(250, classification[0].points);
                assert_eq!(Some("standings.pdf".to_string()), file);
                assert_eq!(Some("standings.xml".to_string()), xml_file);
            }
            other => panic!("wrong shape: {other:?}"),
        }
    }

    #[test]
    fn standings_items_shape() {
        let raw = json!({"items": [{"position": 2, "points": "199"}]});
        match serde_json::from_value::<StandingsResponse>(raw).unwrap() {
            StandingsResponse::Items { items } => {
                assert_eq!(199, items[0].points);
                assert_eq!(2, items[0].position);
            }
            other => panic!("wrong shape: {other:?}"),
        }
    }

    #[test]
    fn standings_bare_list_shape() {
        let raw = json!([{"position": 3, "points": null}]);
        match serde_json::from_value::<StandingsResponse>(raw).unwrap() {
            StandingsResponse::Bare(rows) => assert_eq!(0, rows[0].points),
            other => panic!("wrong shape: {other:?}"),
        }
    }

    #[test]
    fn standings_unrecognized_shape() {
        let raw = json!({"something": "else"});
        assert!(matches!(
            serde_json::from_value::<StandingsResponse>(raw).unwrap(),
            StandingsResponse::Unrecognized(_)
        ));
    }

    #[test]
    fn points_coercion() {
        let row: StandingsRow =
            serde_json::from_value(json!({"points": "not a number"})).unwrap();
        assert_eq!(0, row.points);
        let row: StandingsRow = serde_json::from_value(json!({"points": 17.0})).unwrap();
        assert_eq!(17, row.points);
    }

    #[test]
    fn live_rider_mixed_scalars() {
        let rider: LiveRider = serde_json::from_value(json!({
            "pos": "4",
            "rider_number": 93,
            "rider_name": "Marc",
            "rider_surname": "Marquez",
            "num_lap": null,
            "gap_first": 1.234,
        }))
        .unwrap();
        assert_eq!(Some(4), rider.pos);
        assert_eq!("93", rider.rider_number);
        assert_eq!(None, rider.num_lap);
        assert_eq!("1.234", rider.gap_first);
    }

    #[test]
    fn event_id_fallback_to_uuid() {
        let event: ApiEvent =
            serde_json::from_value(json!({"uuid": "abc", "name": "Test GP"})).unwrap();
        assert_eq!(Some("abc"), event.event_id());
    }
}
