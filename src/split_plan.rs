//! Turn a page set and a split mode into a list of output documents.
//!
//! Planning never fails as a whole: outputs that cannot be produced are
//! reported in [`SplitResult::failures`] next to the ones that can.

use crate::error::PlanError;
use crate::page_range::RangeSpec;
use crate::page_set::{PageRef, PageSet};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// One document with pages `start..=end` (1-based).
    SingleRange { start: u32, end: u32 },
    /// One document per page.
    ExtractAll,
    /// One document per range string, each parsed independently.
    CustomRanges(Vec<String>),
    /// Consecutive groups of `size` pages; the last group may be shorter.
    Chunks { size: u32 },
    /// One document holding the selected pages.
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDocument {
    pub name: String,
    pub pages: Vec<PageRef>,
}

pub type SplitPlan = Vec<OutputDocument>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFailure {
    /// Position of the failed output within the requested mode (the range
    /// index for custom ranges, 0 otherwise).
    pub index: usize,
    pub error: PlanError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    pub outputs: SplitPlan,
    pub failures: Vec<SplitFailure>,
}

impl SplitResult {
    fn failed(index: usize, error: impl Into<PlanError>) -> Self {
        SplitResult {
            outputs: Vec::new(),
            failures: vec![SplitFailure {
                index,
                error: error.into(),
            }],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Plan the output documents for `mode`. Page numbers in the mode refer to
/// 1-based positions in `pages`.
pub fn plan(pages: &PageSet, mode: &SplitMode, base_name: &str) -> SplitResult {
    let entries = pages.entries();
    let total = pages.page_total();

    let result = match mode {
        SplitMode::SingleRange { start, end } => match RangeSpec::span(*start, *end, total) {
            Ok(spec) => SplitResult {
                outputs: vec![OutputDocument {
                    name: format!("{}_{}-{}", base_name, start, end),
                    pages: pick(entries, &spec),
                }],
                failures: Vec::new(),
            },
            Err(e) => SplitResult::failed(0, e),
        },
        SplitMode::ExtractAll => SplitResult {
            outputs: entries
                .iter()
                .enumerate()
                .map(|(i, page)| OutputDocument {
                    name: format!("{}_page{}", base_name, i + 1),
                    pages: vec![page.clone()],
                })
                .collect(),
            failures: Vec::new(),
        },
        SplitMode::CustomRanges(ranges) => {
            let mut result = SplitResult::default();
            for (index, range) in ranges.iter().enumerate() {
                match RangeSpec::parse(range, total) {
                    Ok(spec) if spec.is_empty() => result.failures.push(SplitFailure {
                        index,
                        error: PlanError::EmptyRange(range.clone()),
                    }),
                    Ok(spec) => result.outputs.push(OutputDocument {
                        name: format!("{}_part{}", base_name, index + 1),
                        pages: pick(entries, &spec),
                    }),
                    Err(e) => result.failures.push(SplitFailure {
                        index,
                        error: e.into(),
                    }),
                }
            }
            result
        }
        SplitMode::Chunks { size: 0 } => SplitResult::failed(0, PlanError::ZeroChunkSize),
        SplitMode::Chunks { size } => SplitResult {
            outputs: entries
                .chunks(*size as usize)
                .enumerate()
                .map(|(i, chunk)| OutputDocument {
                    name: format!("{}_part{}", base_name, i + 1),
                    pages: chunk.to_vec(),
                })
                .collect(),
            failures: Vec::new(),
        },
        SplitMode::Selected => {
            let selected: Vec<PageRef> = pages.selected().cloned().collect();
            if selected.is_empty() {
                SplitResult::failed(0, PlanError::NothingSelected)
            } else {
                SplitResult {
                    outputs: vec![OutputDocument {
                        name: format!("{}_selected", base_name),
                        pages: selected,
                    }],
                    failures: Vec::new(),
                }
            }
        }
    };

    for failure in &result.failures {
        warn!(index = failure.index, error = %failure.error, "split output skipped");
    }
    result
}

fn pick(entries: &[PageRef], spec: &RangeSpec) -> Vec<PageRef> {
    spec.indices().map(|i| entries[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RangeError;
    use crate::page_set::PageId;
    use pretty_assertions::assert_eq;

    fn names(result: &SplitResult) -> Vec<&str> {
        result.outputs.iter().map(|o| o.name.as_str()).collect()
    }

    fn indices(output: &OutputDocument) -> Vec<u32> {
        output.pages.iter().map(|p| p.source_index()).collect()
    }

    #[test]
    fn test_single_range() {
        let set = PageSet::from_document("doc", 10);
        let result = plan(&set, &SplitMode::SingleRange { start: 3, end: 5 }, "report");
        assert!(result.is_complete());
        assert_eq!(names(&result), vec!["report_3-5"]);
        assert_eq!(indices(&result.outputs[0]), vec![2, 3, 4]);
    }

    #[test]
    fn test_single_range_out_of_bounds() {
        let set = PageSet::from_document("doc", 4);
        let result = plan(&set, &SplitMode::SingleRange { start: 2, end: 9 }, "report");
        assert!(result.outputs.is_empty());
        assert_eq!(
            result.failures[0].error,
            PlanError::Range(RangeError::PageOutOfRange {
                page: 9,
                total_pages: 4
            })
        );
    }

    #[test]
    fn test_single_range_reversed() {
        let set = PageSet::from_document("doc", 4);
        let result = plan(&set, &SplitMode::SingleRange { start: 3, end: 1 }, "report");
        assert!(matches!(
            result.failures[0].error,
            PlanError::Range(RangeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_extract_all() {
        let set = PageSet::from_document("doc", 4);
        let result = plan(&set, &SplitMode::ExtractAll, "scan");
        assert_eq!(
            names(&result),
            vec!["scan_page1", "scan_page2", "scan_page3", "scan_page4"]
        );
        for (i, output) in result.outputs.iter().enumerate() {
            assert_eq!(indices(output), vec![i as u32]);
        }
    }

    #[test]
    fn test_extract_all_follows_set_order() {
        let mut set = PageSet::from_document("doc", 3);
        set.move_to(&PageId::new("doc", 2), 0);
        let result = plan(&set, &SplitMode::ExtractAll, "scan");
        let order: Vec<u32> = result.outputs.iter().flat_map(indices).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_custom_ranges_partial_failure() {
        let set = PageSet::from_document("doc", 10);
        let mode = SplitMode::CustomRanges(vec!["1-3".into(), "4-x".into()]);
        let result = plan(&set, &mode, "doc");
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert!(matches!(
            result.failures[0].error,
            PlanError::Range(RangeError::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_custom_ranges_bare_number_is_one_page() {
        let set = PageSet::from_document("doc", 10);
        let mode = SplitMode::CustomRanges(vec!["7".into(), "2,9-10".into()]);
        let result = plan(&set, &mode, "doc");
        assert!(result.is_complete());
        assert_eq!(names(&result), vec!["doc_part1", "doc_part2"]);
        assert_eq!(indices(&result.outputs[0]), vec![6]);
        assert_eq!(indices(&result.outputs[1]), vec![1, 8, 9]);
    }

    #[test]
    fn test_custom_ranges_empty_entry_fails() {
        let set = PageSet::from_document("doc", 3);
        let mode = SplitMode::CustomRanges(vec![" ".into(), "1".into()]);
        let result = plan(&set, &mode, "doc");
        assert_eq!(names(&result), vec!["doc_part2"]);
        assert_eq!(result.failures[0].index, 0);
        assert!(matches!(result.failures[0].error, PlanError::EmptyRange(_)));
    }

    #[test]
    fn test_chunks() {
        let set = PageSet::from_document("doc", 5);
        let result = plan(&set, &SplitMode::Chunks { size: 2 }, "doc");
        let groups: Vec<Vec<u32>> = result.outputs.iter().map(indices).collect();
        assert_eq!(groups, vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_zero_chunk_size() {
        let set = PageSet::from_document("doc", 5);
        let result = plan(&set, &SplitMode::Chunks { size: 0 }, "doc");
        assert_eq!(result.failures[0].error, PlanError::ZeroChunkSize);
    }

    #[test]
    fn test_selected() {
        let mut set = PageSet::from_document("doc", 5);
        let result = plan(&set, &SplitMode::Selected, "doc");
        assert_eq!(result.failures[0].error, PlanError::NothingSelected);

        set.toggle_select(&PageId::new("doc", 3));
        set.toggle_select(&PageId::new("doc", 1));
        let result = plan(&set, &SplitMode::Selected, "doc");
        assert_eq!(names(&result), vec!["doc_selected"]);
        assert_eq!(indices(&result.outputs[0]), vec![1, 3]);
    }

    #[test]
    fn test_plan_carries_rotation() {
        let mut set = PageSet::from_document("doc", 2);
        set.rotate(&PageId::new("doc", 1), crate::page_set::Direction::Right);
        let result = plan(&set, &SplitMode::SingleRange { start: 1, end: 2 }, "doc");
        assert_eq!(result.outputs[0].pages[1].rotation().degrees(), 90);
    }
}
