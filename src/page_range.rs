use crate::error::RangeError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

static SINGLE_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static PAGE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)-([0-9]+)$").unwrap());

/// A validated, ascending and de-duplicated list of 1-based page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RangeSpec(Vec<u32>);

impl RangeSpec {
    /// Parse a comma-separated page range like "1-3,7,9-10".
    ///
    /// Tokens are trimmed and empty tokens are skipped, so `""` and `"1,2,"`
    /// are accepted. Reversed spans such as "5-1" are rejected.
    pub fn parse(input: &str, total_pages: u32) -> Result<Self, RangeError> {
        let mut pages = BTreeSet::new();

        for token in input.split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }

            if SINGLE_PAGE.is_match(token) {
                let page = check_page(parse_number(token), total_pages)?;
                pages.insert(page);
            } else if let Some(caps) = PAGE_SPAN.captures(token) {
                let start = parse_number(&caps[1]);
                let end = parse_number(&caps[2]);
                if start > end {
                    return Err(RangeError::InvalidRange {
                        token: token.to_string(),
                        start: clamp_u32(start),
                        end: clamp_u32(end),
                    });
                }
                let start = check_page(start, total_pages)?;
                let end = check_page(end, total_pages)?;
                pages.extend(start..=end);
            } else {
                return Err(RangeError::MalformedToken {
                    token: token.to_string(),
                });
            }
        }

        Ok(RangeSpec(pages.into_iter().collect()))
    }

    /// Validate an explicit inclusive span with the same rules as [`RangeSpec::parse`].
    pub fn span(start: u32, end: u32, total_pages: u32) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange {
                token: format!("{}-{}", start, end),
                start,
                end,
            });
        }
        let start = check_page(start.into(), total_pages)?;
        let end = check_page(end.into(), total_pages)?;
        Ok(RangeSpec((start..=end).collect()))
    }

    /// 1-based page numbers in ascending order.
    pub fn pages(&self) -> &[u32] {
        &self.0
    }

    /// 0-based page indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|&p| (p - 1) as usize)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.binary_search(&page).is_ok()
    }
}

/// Renders the compact form, collapsing consecutive pages: `1-3,5`.
impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut iter = self.0.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if start == end {
                write!(f, "{}", start)?;
            } else {
                write!(f, "{}-{}", start, end)?;
            }
        }
        Ok(())
    }
}

/// Parse a page range string into 1-based page numbers, sorted and de-duplicated.
pub fn parse(input: &str, total_pages: u32) -> Result<RangeSpec, RangeError> {
    RangeSpec::parse(input, total_pages)
}

// Digits-only input that overflows u64 can only be out of range anyway.
fn parse_number(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn clamp_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn check_page(page: u64, total_pages: u32) -> Result<u32, RangeError> {
    if page == 0 || page > u64::from(total_pages) {
        return Err(RangeError::PageOutOfRange { page, total_pages });
    }
    Ok(page as u32)
}
