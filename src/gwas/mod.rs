//! Typed view over a GWAS catalog associations export.

pub mod summary;

use std::{
    collections::{BTreeSet, HashMap},
    io::Read,
    path::Path,
};
use tracing::debug;

use crate::error::Result;
use crate::mask::ValidityMask;
use crate::parse::parse;
use crate::table::Table;

pub use summary::{CatalogSummary, SUMMARY_MIN_ASSOCIATIONS};

pub const DISEASE_COLUMN: &str = "DISEASE/TRAIT";
pub const CHROMOSOME_COLUMN: &str = "CHR_ID";
pub const POSITION_COLUMN: &str = "CHR_POS";
pub const EFFECT_SIZE_COLUMN: &str = "OR or BETA";
pub const SNP_COLUMN: &str = "SNPS";

/// Chromosome labels as they appear in `CHR_ID`.
pub const CHROMOSOMES: [&str; 24] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y",
];

/// Indices of the catalog columns the view works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CatalogColumns {
    disease: usize,
    chromosome: usize,
    position: usize,
    effect_size: usize,
    snps: usize,
}

impl CatalogColumns {
    fn resolve(table: &Table) -> Result<Self> {
        Ok(Self {
            disease: table.column_index(DISEASE_COLUMN)?,
            chromosome: table.column_index(CHROMOSOME_COLUMN)?,
            position: table.column_index(POSITION_COLUMN)?,
            effect_size: table.column_index(EFFECT_SIZE_COLUMN)?,
            snps: table.column_index(SNP_COLUMN)?,
        })
    }
}

/// A column given either by position or by header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ColumnRef<'_> {
    fn from(i: usize) -> Self {
        ColumnRef::Index(i)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

/// The GWAS catalog (or a subset of it) loaded in memory.
#[derive(Debug, Clone)]
pub struct GwasCatalog {
    table: Table,
    cols: CatalogColumns,
}

impl GwasCatalog {
    /// Load the catalog from a `.tsv` export or its `.zip` download.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(Table::from_path(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_table(Table::from_reader(reader)?)
    }

    /// Wrap a table. Fails with `UnknownColumn` unless every catalog column is present.
    pub fn from_table(table: Table) -> Result<Self> {
        let cols = CatalogColumns::resolve(&table)?;
        Ok(Self { table, cols })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Number of associations.
    pub fn size(&self) -> usize {
        self.table.row_count()
    }

    pub fn unique_diseases(&self) -> BTreeSet<String> {
        self.table.unique_values(self.cols.disease)
    }

    pub fn unique_chromosomes(&self) -> BTreeSet<String> {
        self.table.unique_values(self.cols.chromosome)
    }

    /// Associations recorded for each disease.
    pub fn disease_counts(&self) -> HashMap<String, usize> {
        self.table.value_counts(self.cols.disease)
    }

    /// Subset of associations whose `column` is exactly `value`.
    ///
    /// Panics if an index is out of range for the header.
    pub fn filter_by_column<'a>(
        &self,
        column: impl Into<ColumnRef<'a>>,
        value: &str,
    ) -> Result<GwasCatalog> {
        let col = match column.into() {
            ColumnRef::Index(i) => {
                assert!(
                    i < self.table.column_count(),
                    "column {i} out of range ({} columns)",
                    self.table.column_count()
                );
                i
            }
            ColumnRef::Name(name) => self.table.column_index(name)?,
        };
        let subset = self.table.filter_rows(col, value);
        debug!(col, value, rows = subset.row_count(), "filtered catalog");
        GwasCatalog::from_table(subset)
    }

    pub fn filter_by_disease(&self, disease: &str) -> Result<GwasCatalog> {
        self.filter_by_column(self.cols.disease, disease)
    }

    pub fn filter_by_chromosome(&self, chromosome: &str) -> Result<GwasCatalog> {
        self.filter_by_column(self.cols.chromosome, chromosome)
    }

    /// `(CHR_POS, OR or BETA)` for every association where both parse and are
    /// positive, in the order the rows appear. Positions are not sorted.
    pub fn positions_and_effect_sizes(&self) -> Vec<(u64, f64)> {
        let positions = ValidityMask::valid_indices::<u64>(&self.table, self.cols.position);
        let effects = ValidityMask::valid_indices::<f64>(&self.table, self.cols.effect_size);

        positions
            .intersect(&effects)
            .iter()
            .filter_map(|i| {
                let pos = parse::<u64>(self.table.cell(i, self.cols.position))?;
                let es = parse::<f64>(self.table.cell(i, self.cols.effect_size))?;
                Some((pos, es))
            })
            .collect()
    }

    /// Single well-formed RSIDs from `SNPS`. Entries with a space, tab or
    /// semicolon list several merged variants and are left out.
    pub fn unique_rsids(&self) -> BTreeSet<String> {
        self.table
            .rows()
            .map(|row| &row[self.cols.snps])
            .filter(|snp| is_single_rsid(snp))
            .cloned()
            .collect()
    }

    /// Number of diseases with more than [`SUMMARY_MIN_ASSOCIATIONS`] associations.
    pub fn summary_count(&self) -> usize {
        self.summary().diseases_over_threshold
    }

    pub fn summary(&self) -> CatalogSummary {
        let counts = self.disease_counts();
        CatalogSummary {
            associations: self.size(),
            diseases: counts.len(),
            diseases_over_threshold: counts
                .values()
                .filter(|&&n| n > SUMMARY_MIN_ASSOCIATIONS)
                .count(),
        }
    }
}

fn is_single_rsid(snp: &str) -> bool {
    snp.starts_with("rs") && !snp.contains([' ', '\t', ';'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use anyhow::Result;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,gwascat=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const HEADER: &str = "DATE\tPUBMEDID\tDISEASE/TRAIT\tCHR_ID\tCHR_POS\tSNPS\tOR or BETA";

    fn catalog(rows: &[[&str; 5]]) -> GwasCatalog {
        let mut tsv = String::from(HEADER);
        tsv.push('\n');
        for (i, [disease, chr, pos, snp, es]) in rows.iter().enumerate() {
            tsv.push_str(&format!(
                "2021-02-25\t{}\t{disease}\t{chr}\t{pos}\t{snp}\t{es}\n",
                30000000 + i
            ));
        }
        GwasCatalog::from_reader(tsv.as_bytes()).unwrap()
    }

    fn mixed() -> GwasCatalog {
        catalog(&[
            ["Type 2 diabetes", "6", "32000000", "rs1", "1.2"],
            ["Type 2 diabetes", "6", "31000000", "rs2", "0.9"],
            ["Type 2 diabetes", "1", "1000", "rs3", "1.1"],
            ["Height", "6", "5000", "rs4", "0.3"],
            ["Type 2 diabetes", "6", "", "rs5; rs6", "1.4"],
            ["Asthma", "X", "77", "rs7", "NR"],
        ])
    }

    #[test]
    fn resolves_columns_by_name() {
        let c = mixed();
        assert_eq!(c.size(), 6);
        assert_eq!(c.cols.disease, 2);
        assert_eq!(c.cols.effect_size, 6);
    }

    #[test]
    fn missing_catalog_column_is_rejected() {
        let tsv = "DISEASE/TRAIT\tCHR_ID\tCHR_POS\tSNPS\nA\t1\t2\trs1\n";
        let err = GwasCatalog::from_reader(tsv.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { ref name } if name == "OR or BETA"));
    }

    #[test]
    fn unique_diseases_and_chromosomes() {
        let c = mixed();
        let diseases: Vec<String> = c.unique_diseases().into_iter().collect();
        assert_eq!(diseases, vec!["Asthma", "Height", "Type 2 diabetes"]);
        assert_eq!(c.unique_chromosomes().len(), 3);
    }

    #[test]
    fn pairs_skip_unparseable_and_non_positive_positions() {
        let c = catalog(&[
            ["D", "1", "100", "rs1", "1.5"],
            ["D", "1", "abc", "rs2", "1.5"],
            ["D", "1", "-5", "rs3", "1.5"],
            ["D", "1", "0", "rs4", "1.5"],
        ]);
        assert_eq!(c.positions_and_effect_sizes(), vec![(100, 1.5)]);
    }

    #[test]
    fn pairs_skip_bad_effect_sizes() {
        let c = catalog(&[
            ["D", "1", "10", "rs1", ""],
            ["D", "1", "20", "rs2", "NR"],
            ["D", "1", "30", "rs3", "0"],
            ["D", "1", "40", "rs4", "-0.2"],
            ["D", "1", "50", "rs5", "0.02"],
        ]);
        assert_eq!(c.positions_and_effect_sizes(), vec![(50, 0.02)]);
    }

    #[test]
    fn pairs_follow_row_order_and_round_trip() {
        let c = mixed();
        let pairs = c.positions_and_effect_sizes();
        assert_eq!(
            pairs,
            vec![
                (32000000, 1.2),
                (31000000, 0.9),
                (1000, 1.1),
                (5000, 0.3)
            ]
        );

        let t = c.table();
        let pos_col = t.column_index(POSITION_COLUMN).unwrap();
        let es_col = t.column_index(EFFECT_SIZE_COLUMN).unwrap();
        for (row, (pos, es)) in pairs.iter().enumerate() {
            assert_eq!(t.cell(row, pos_col).parse::<u64>().unwrap(), *pos);
            let reparsed: f64 = t.cell(row, es_col).parse().unwrap();
            assert_eq!(reparsed.to_bits(), es.to_bits());
        }
    }

    #[test]
    fn rsids_are_single_and_prefixed() {
        let c = catalog(&[
            ["D", "1", "1", "rs123", "1"],
            ["D", "1", "2", "rs1; rs2", "1"],
            ["D", "1", "3", "nors1", "1"],
            ["D", "1", "4", "rs1 rs2", "1"],
            ["D", "1", "5", "rs123", "1"],
        ]);
        assert_eq!(c.unique_rsids(), BTreeSet::from(["rs123".to_string()]));
    }

    #[test]
    fn rsid_rules() {
        assert!(is_single_rsid("rs7903146"));
        assert!(!is_single_rsid("RS7903146"));
        assert!(!is_single_rsid("chr6:32000000"));
        assert!(!is_single_rsid("rs1;rs2"));
        assert!(!is_single_rsid("rs1\trs2"));
        assert!(!is_single_rsid(""));
    }

    #[test]
    fn filter_by_name_and_index_agree() -> Result<()> {
        let c = mixed();
        let by_name = c.filter_by_column(DISEASE_COLUMN, "Type 2 diabetes")?;
        let by_index = c.filter_by_column(2usize, "Type 2 diabetes")?;
        assert_eq!(by_name.size(), 4);
        assert_eq!(by_name.table(), by_index.table());
        Ok(())
    }

    #[test]
    fn filter_by_unknown_name_fails() {
        let err = mixed().filter_by_column("TRAIT", "x").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { .. }));
    }

    #[test]
    fn filter_without_match_is_empty() -> Result<()> {
        init_test_logging();
        let none = mixed().filter_by_disease("Gout")?;
        assert_eq!(none.size(), 0);
        assert!(none.positions_and_effect_sizes().is_empty());
        assert!(none.unique_rsids().is_empty());
        assert_eq!(none.summary_count(), 0);
        Ok(())
    }

    #[test]
    fn disease_then_chromosome_equals_both_at_once() -> Result<()> {
        init_test_logging();
        let c = mixed();
        let sequential = c
            .filter_by_disease("Type 2 diabetes")?
            .filter_by_chromosome("6")?;

        let t = c.table();
        let both = t.filter_rows_all(&[
            (t.column_index(DISEASE_COLUMN)?, "Type 2 diabetes"),
            (t.column_index(CHROMOSOME_COLUMN)?, "6"),
        ]);

        assert_eq!(sequential.table(), &both);
        assert_eq!(sequential.size(), 3);
        assert_eq!(
            sequential.positions_and_effect_sizes(),
            vec![(32000000, 1.2), (31000000, 0.9)]
        );
        Ok(())
    }

    #[test]
    fn summary_counts_diseases_over_nine() {
        let positions: Vec<String> = (0..10).map(|i| (100 + i).to_string()).collect();
        let mut rows: Vec<[&str; 5]> = positions
            .iter()
            .map(|p| ["Common", "1", p.as_str(), "rs1", "1"])
            .collect();
        rows.extend(std::iter::repeat(["Rare", "1", "5", "rs2", "1"]).take(9));
        let c = catalog(&rows);

        assert_eq!(c.summary_count(), 1);
        assert_eq!(
            c.summary(),
            CatalogSummary {
                associations: 19,
                diseases: 2,
                diseases_over_threshold: 1,
            }
        );
    }
}
