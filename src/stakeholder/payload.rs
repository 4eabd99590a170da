use serde::Deserialize;

use crate::diagram::{Region, Subsets};

/// Body of a diagram request. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VennRequest {
    #[serde(rename = "categorias")]
    pub categories: Categories,
}

impl VennRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Stakeholder names per region. Every bucket is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Categories {
    #[serde(rename = "inactivo")]
    pub inactive: Vec<String>,
    #[serde(rename = "discrecional")]
    pub discretionary: Vec<String>,
    #[serde(rename = "demandante")]
    pub demanding: Vec<String>,
    #[serde(rename = "dominante")]
    pub dominant: Vec<String>,
    #[serde(rename = "peligroso")]
    pub dangerous: Vec<String>,
    #[serde(rename = "dependiente")]
    pub dependent: Vec<String>,
    #[serde(rename = "criticos")]
    pub definitive: Vec<String>,
}

impl Categories {
    pub fn bucket(&self, region: Region) -> &[String] {
        match region {
            Region::OnlyA => &self.inactive,
            Region::OnlyB => &self.discretionary,
            Region::OnlyC => &self.demanding,
            Region::OnlyAB => &self.dominant,
            Region::OnlyAC => &self.dangerous,
            Region::OnlyBC => &self.dependent,
            Region::AllThree => &self.definitive,
        }
    }

    /// Bucket sizes in region order A, B, C, A∩B, A∩C, B∩C, A∩B∩C.
    pub fn subsets(&self) -> Subsets {
        Region::ALL.map(|region| self.bucket(region).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &serde_json::Value) -> Result<VennRequest, serde_json::Error> {
        VennRequest::from_slice(value.to_string().as_bytes())
    }

    #[test]
    fn test_subsets_follow_region_order() {
        let request = parse(&json!({
            "categorias": {
                "inactivo": ["a"],
                "discrecional": ["b", "b"],
                "demandante": ["c", "c", "c"],
                "dominante": ["d", "d", "d", "d"],
                "peligroso": [],
                "dependiente": ["f"],
                "criticos": ["g", "g"]
            }
        }))
        .unwrap();
        assert_eq!(request.categories.subsets(), [1, 2, 3, 4, 0, 1, 2]);
        assert_eq!(request.categories.bucket(Region::OnlyAB).len(), 4);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let request = parse(&json!({
            "extra": 1,
            "categorias": {
                "inactivo": [], "discrecional": [], "demandante": [], "dominante": [],
                "peligroso": [], "dependiente": [], "criticos": [], "otro": ["x"]
            }
        }))
        .unwrap();
        assert_eq!(request.categories, Categories::default());
    }

    #[test]
    fn test_missing_bucket_is_rejected() {
        let err = parse(&json!({
            "categorias": {
                "inactivo": [], "discrecional": [], "demandante": [], "dominante": [],
                "peligroso": [], "dependiente": []
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("criticos"));
    }

    #[test]
    fn test_malformed_bodies_are_rejected() {
        assert!(parse(&json!({})).is_err());
        assert!(parse(&json!([1, 2, 3])).is_err());
        assert!(parse(&json!({"categorias": {"inactivo": "A"}})).is_err());
        assert!(VennRequest::from_slice(b"{not json").is_err());
        assert!(VennRequest::from_slice(b"").is_err());
    }
}
