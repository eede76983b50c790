//! Company rows as stored in the `kotra` table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tier::Tier;

/// Label used for any absent or empty category.
pub const UNCLASSIFIED: &str = "미분류";

/// One company row. Known columns are typed; everything else is kept
/// verbatim so the JSON report reproduces the source row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name_kr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw value as stored; only absent or empty values become `미분류`.
fn label(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => UNCLASSIFIED,
    }
}

impl CompanyRecord {
    pub fn industry_label(&self) -> &str {
        label(&self.industry_major)
    }

    pub fn entry_type_label(&self) -> &str {
        label(&self.entry_type)
    }

    pub fn investment_type_label(&self) -> &str {
        label(&self.investment_type)
    }
}

/// A record with its derived revenue estimate and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCompany {
    #[serde(flatten)]
    pub record: CompanyRecord,
    #[serde(rename = "estimatedRevenue")]
    pub estimated_revenue: u64,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_empty_labels_are_unclassified() {
        let record = CompanyRecord {
            industry_major: Some(String::new()),
            entry_type: None,
            investment_type: Some("합작투자".into()),
            ..Default::default()
        };
        assert_eq!(record.industry_label(), UNCLASSIFIED);
        assert_eq!(record.entry_type_label(), UNCLASSIFIED);
        assert_eq!(record.investment_type_label(), "합작투자");
    }

    #[test]
    fn test_labels_are_not_trimmed() {
        let record = CompanyRecord {
            entry_type: Some(" 생산법인".into()),
            investment_type: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(record.entry_type_label(), " 생산법인");
        assert_eq!(record.investment_type_label(), "  ");
    }

    #[test]
    fn test_unknown_columns_preserved() {
        let json = r#"{"company_name_kr":"가나","id":42,"country":"India","phone":null}"#;
        let record: CompanyRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.company_name_kr.as_deref(), Some("가나"));
        assert!(record.phone.is_none());
        assert_eq!(record.extra["id"], 42);
        assert_eq!(record.extra["country"], "India");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["country"], "India");
    }
}
