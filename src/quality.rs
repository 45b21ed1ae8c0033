use std::collections::BTreeMap;

use crate::record::COLUMNS;

/// Field-count breakdown of the raw records of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityReport {
    pub total: usize,
    pub conforming: usize,
    pub malformed: usize,
    /// arity → number of records
    pub by_arity: BTreeMap<usize, usize>,
    pub empty_categories: Vec<String>,
    pub empty_brands: Vec<String>,
}

impl QualityReport {
    pub fn from_records(records: &[Vec<String>]) -> Self {
        let mut by_arity = BTreeMap::new();
        for r in records {
            *by_arity.entry(r.len()).or_insert(0) += 1;
        }
        let conforming = by_arity.get(&COLUMNS.len()).copied().unwrap_or(0);
        QualityReport {
            total: records.len(),
            conforming,
            malformed: records.len() - conforming,
            by_arity,
            ..Default::default()
        }
    }

    /// Malformed records per 100 conforming ones.
    pub fn malformed_per_hundred(&self) -> Option<f64> {
        (self.conforming > 0).then(|| self.malformed as f64 * 100.0 / self.conforming as f64)
    }

    pub fn print(&self) {
        println!("Records:    {}", self.total);
        println!("Conforming: {}", self.conforming);
        println!("Malformed:  {}", self.malformed);
        match self.malformed_per_hundred() {
            Some(r) => println!("Malformed per 100 conforming: {:.1}", r),
            None => println!("Malformed per 100 conforming: -"),
        }
        for (arity, n) in &self.by_arity {
            println!("  {:>2} fields: {}", arity, n);
        }
        if !self.empty_categories.is_empty() {
            println!("Categories with no brands: {}", self.empty_categories.join(", "));
        }
        if !self.empty_brands.is_empty() {
            println!("Brands with no products: {}", self.empty_brands.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(arities: &[usize]) -> Vec<Vec<String>> {
        arities.iter().map(|n| vec![String::new(); *n]).collect()
    }

    #[test]
    fn counts_by_arity() {
        let q = QualityReport::from_records(&recs(&[8, 8, 6, 9, 8, 6]));
        assert_eq!(q.total, 6);
        assert_eq!(q.conforming, 3);
        assert_eq!(q.malformed, 3);
        assert_eq!(q.by_arity.get(&6), Some(&2));
        assert_eq!(q.by_arity.get(&9), Some(&1));
        assert_eq!(q.malformed_per_hundred(), Some(100.0));
    }

    #[test]
    fn ratio_undefined_without_conforming() {
        let q = QualityReport::from_records(&recs(&[3, 4]));
        assert_eq!(q.malformed_per_hundred(), None);
        assert_eq!(QualityReport::from_records(&[]).malformed_per_hundred(), None);
    }
}
