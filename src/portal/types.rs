use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Portlet instance every data request is addressed to
pub const PORTLET_ID: &str = "lincspartdisplaycdc_WAR_lincspartcdcportlet";

/// Aggregation granularity requested from the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Hourly,
    Daily,
    Monthly,
    Yearly,
}

impl Resolution {
    /// Value of the `p_p_resource_id` query parameter
    pub fn resource_id(&self) -> &'static str {
        match self {
            Self::Hourly => "urlCdcHeure",
            Self::Daily => "urlCdcJour",
            Self::Monthly => "urlCdcMois",
            Self::Yearly => "urlCdcAn",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" | "hour" => Ok(Self::Hourly),
            "daily" | "day" => Ok(Self::Daily),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(format!(
                "unknown resolution '{other}' (expected hourly, daily, monthly or yearly)"
            )),
        }
    }
}

/// Body of a data resource response
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse {
    #[serde(rename = "etat")]
    pub state: ResponseState,

    #[serde(rename = "Graphe")]
    pub graph: Graph,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseState {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Graph {
    #[serde(rename = "Data")]
    pub data: Vec<RawSample>,
}

/// One half-hour bucket as reported by the portal
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawSample {
    /// 1-based bucket index from the start of the requested range
    #[serde(rename = "ordre")]
    pub order: i64,

    /// Energy over the bucket
    #[serde(rename = "valeur")]
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_ids_match_portal_names() {
        assert_eq!(Resolution::Hourly.resource_id(), "urlCdcHeure");
        assert_eq!(Resolution::Daily.resource_id(), "urlCdcJour");
        assert_eq!(Resolution::Monthly.resource_id(), "urlCdcMois");
        assert_eq!(Resolution::Yearly.resource_id(), "urlCdcAn");
    }

    #[test]
    fn resolution_from_str() {
        assert_eq!("Hourly".parse::<Resolution>(), Ok(Resolution::Hourly));
        assert_eq!("year".parse::<Resolution>(), Ok(Resolution::Yearly));
        assert!("weekly".parse::<Resolution>().is_err());
    }

    #[test]
    fn decodes_portal_json() {
        let body = r#"{
            "etat": {"value": "termine"},
            "Graphe": {"Data": [{"ordre": 1, "valeur": 0.512}, {"ordre": 2, "valeur": 1}]}
        }"#;
        let response: DataResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.state.value, "termine");
        assert_eq!(response.graph.data.len(), 2);
        assert_eq!(
            response.graph.data[1],
            RawSample {
                order: 2,
                value: 1.0
            }
        );
    }

    #[test]
    fn rejects_wrong_field_names() {
        let body = r#"{"etat": {"value": "termine"}, "graphe": {"data": []}}"#;
        assert!(serde_json::from_str::<DataResponse>(body).is_err());
    }
}
