//! 1-indexed page slicing.

/// `list[(page-1)*page_size .. page*page_size]`, clamped to the list.
///
/// `page` and `page_size` are expected to be validated (>= 1); a zero page
/// is treated as page 1.
pub fn slice<T: Clone>(list: &[T], page: u32, page_size: u32) -> Vec<T> {
    let (start, end) = bounds(page, page_size);
    let start = start.min(list.len());
    let end = end.min(list.len());
    list[start..end].to_vec()
}

fn bounds(page: u32, page_size: u32) -> (usize, usize) {
    let page = page.max(1) as usize;
    let size = page_size as usize;
    let start = (page - 1).saturating_mul(size);
    (start, start.saturating_add(size))
}
