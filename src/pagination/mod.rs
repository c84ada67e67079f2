use std::ops::Range;

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 20;

pub fn is_valid_page_size(page_size: usize) -> bool {
    PAGE_SIZE_OPTIONS.contains(&page_size)
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

// Pages are 1-based. No clamping of `page` happens here; an out-of-range page
// simply produces an empty range.
pub fn page_range(len: usize, page_size: usize, page: usize) -> Range<usize> {
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn page_slice<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    &items[page_range(items.len(), page_size, page)]
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return 1;
    }
    page.clamp(1, total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 10), 10);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn slice_never_leaves_bounds() {
        for len in 0..45usize {
            for size in PAGE_SIZE_OPTIONS {
                for page in 0..8usize {
                    let range = page_range(len, size, page);
                    assert!(range.start <= range.end);
                    assert!(range.end <= len);
                    assert!(range.len() <= size);
                }
            }
        }
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let items: Vec<u32> = (1..=21).collect();
        assert_eq!(page_slice(&items, 20, 1).len(), 20);
        assert_eq!(page_slice(&items, 20, 2), &[21]);
        assert!(page_slice(&items, 20, 3).is_empty());
    }

    #[test]
    fn clamp_page_handles_empty_and_overflow() {
        assert_eq!(clamp_page(3, 0), 1);
        assert_eq!(clamp_page(3, 2), 2);
        assert_eq!(clamp_page(0, 2), 1);
        assert_eq!(clamp_page(2, 5), 2);
    }

    #[test]
    fn page_sizes_come_from_the_fixed_options() {
        assert!(is_valid_page_size(50));
        assert!(!is_valid_page_size(25));
        assert!(is_valid_page_size(DEFAULT_PAGE_SIZE));
    }
}
