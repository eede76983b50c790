//! Revenue estimate and tier assignment for a single record.

use super::record::{CompanyRecord, ScoredCompany};
use super::tier::Tier;
use super::weights::WeightTables;

/// `round(base × entry × investment × industry weight)` in KRW.
///
/// Multiplication order is fixed so results match the reference figures
/// to the won.
pub fn estimate_revenue(record: &CompanyRecord, tables: &WeightTables) -> u64 {
    let industry = tables.industry(record.industry_label());

    let mut revenue = industry.base_revenue;
    revenue *= tables.entry_weight(record.entry_type_label());
    revenue *= tables.investment_weight(record.investment_type_label());
    revenue *= industry.weight;

    revenue.round().max(0.0) as u64
}

/// Score and tier one record. Pure and total.
pub fn classify(record: &CompanyRecord, tables: &WeightTables) -> ScoredCompany {
    let estimated_revenue = estimate_revenue(record, tables);
    ScoredCompany {
        record: record.clone(),
        estimated_revenue,
        tier: Tier::from_revenue(estimated_revenue, &tables.thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::record::UNCLASSIFIED;
    use crate::targeting::weights::IndustryWeight;

    fn record(industry: &str, entry: &str, investment: &str) -> CompanyRecord {
        CompanyRecord {
            industry_major: Some(industry.into()),
            entry_type: Some(entry.into()),
            investment_type: Some(investment.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_finance_joint_venture_is_premium() {
        let tables = WeightTables::builtin().unwrap();
        let scored = classify(&record("금융 및 보험업", "생산법인", "합작투자"), &tables);
        assert_eq!(scored.estimated_revenue, 202_800_000);
        assert_eq!(scored.tier, Tier::Premium);
    }

    #[test]
    fn test_unclassified_is_lowest_tier() {
        let tables = WeightTables::builtin().unwrap();
        let scored = classify(&record(UNCLASSIFIED, UNCLASSIFIED, UNCLASSIFIED), &tables);
        assert_eq!(scored.estimated_revenue, 6_125_000);
        assert_eq!(scored.tier, Tier::Standard);

        // absent labels behave exactly like explicit 미분류
        let empty = classify(&CompanyRecord::default(), &tables);
        assert_eq!(empty.estimated_revenue, scored.estimated_revenue);
    }

    #[test]
    fn test_unknown_entry_label_is_neutral() {
        let tables = WeightTables::builtin().unwrap();
        // 80M × 1.0 × 1.3 × 1.3
        let scored = classify(&record("금융 및 보험업", "현지법인", "합작투자"), &tables);
        assert_eq!(scored.estimated_revenue, 135_200_000);
        assert_eq!(scored.tier, Tier::Premium);
    }

    #[test]
    fn test_unknown_labels_use_fallback_weights() {
        let tables = WeightTables::builtin().unwrap();
        // unknown industry → 미분류 row (25M × 0.7); unknown entry/investment → 1.0
        let unknown = classify(&record("우주항공업", "합자회사", "지분투자"), &tables);
        assert_eq!(unknown.estimated_revenue, 17_500_000);
        assert_eq!(unknown.tier, Tier::Standard);
    }

    #[test]
    fn test_exact_threshold_lands_in_higher_tier() {
        let mut tables = WeightTables::builtin().unwrap();
        for (label, base) in [("P", 100_000_000.0), ("H", 50_000_000.0), ("M", 20_000_000.0)] {
            tables.industries.insert(label.into(), IndustryWeight { base_revenue: base, weight: 1.0 });
        }
        tables.entry_types.insert("x".into(), 1.0);
        tables.investment_types.insert("x".into(), 1.0);

        let tier = |label: &str| classify(&record(label, "x", "x"), &tables);
        assert_eq!(tier("P").estimated_revenue, 100_000_000);
        assert_eq!(tier("P").tier, Tier::Premium);
        assert_eq!(tier("H").tier, Tier::High);
        assert_eq!(tier("M").tier, Tier::Medium);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let tables = WeightTables::builtin().unwrap();
        let rec = record("G. 도매 및 소매업", "판매법인", "단독투자");
        let first = classify(&rec, &tables);
        for _ in 0..10 {
            assert_eq!(classify(&rec, &tables), first);
        }
        // 35M × 1.2 × 1.0 × 0.9
        assert_eq!(first.estimated_revenue, 37_800_000);
        assert_eq!(first.tier, Tier::Medium);
    }
}
