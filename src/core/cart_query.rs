//! 購物車與網址查詢字串之間的轉換，例如 `cart=CIS-120+CIS-160`

use crate::domain::model::CourseId;
use crate::utils::error::Result;

pub const CART_QUERY_DELIMITER: char = '+';

pub fn to_query(ids: &[CourseId]) -> String {
    ids.iter()
        .map(CourseId::to_string)
        .collect::<Vec<_>>()
        .join(&CART_QUERY_DELIMITER.to_string())
}

/// 解析查詢字串並保留順序。`+` 經網址解碼後會變成空白，因此空白也視為分隔符號。
pub fn from_query(query: &str) -> Result<Vec<CourseId>> {
    query
        .split(|c: char| c == CART_QUERY_DELIMITER || c == ';' || c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse::<CourseId>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_order() {
        let ids = vec![
            CourseId::new("CIS", 240),
            CourseId::new("MATH", 104),
            CourseId::new("CIS", 120),
        ];
        let query = to_query(&ids);
        assert_eq!(query, "CIS-240+MATH-104+CIS-120");
        assert_eq!(from_query(&query).unwrap(), ids);
    }

    #[test]
    fn test_query_accepts_other_delimiters() {
        let ids = from_query("CIS-120;CIS-160 CIS-240,,").unwrap();
        assert_eq!(ids.len(), 3);
        assert!(from_query("").unwrap().is_empty());
        assert!(from_query("CIS-120+bogus").is_err());
    }
}
