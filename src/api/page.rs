use serde::{Deserialize, Serialize};

/// Query string for paginated listings. Both fields are optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: i64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            ((total_elements.max(0) as u64 + size as u64 - 1) / size as u64) as u32
        };
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Page::<i32>::new(vec![], 0, 20, 41).total_pages, 3);
        assert_eq!(Page::<i32>::new(vec![], 0, 20, 40).total_pages, 2);
        assert_eq!(Page::<i32>::new(vec![], 0, 20, 0).total_pages, 0);
    }

    #[test]
    fn serializes_spring_style_keys() {
        let value = serde_json::to_value(Page::new(vec![1, 2], 0, 2, 5)).unwrap();
        assert_eq!(value["totalElements"], 5);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["content"], serde_json::json!([1, 2]));
    }
}
