use crate::report::{Filter, FilterExpression, MatchType, StringFilter};

pub const CHANNEL_GROUP_FIELD: &str = "sessionDefaultChannelGroup";
pub const ORGANIC_SEARCH_CHANNEL: &str = "Organic Search";

/// Restrict a report to sessions whose default channel group is
/// `Organic Search`.
pub fn organic_search_filter() -> FilterExpression {
    FilterExpression {
        filter: Filter {
            field_name: CHANNEL_GROUP_FIELD.to_string(),
            string_filter: StringFilter {
                match_type: MatchType::Exact,
                value: ORGANIC_SEARCH_CHANNEL.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn organic_filter_wire_shape() {
        let value = serde_json::to_value(organic_search_filter()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "filter": {
                    "fieldName": "sessionDefaultChannelGroup",
                    "stringFilter": { "matchType": "EXACT", "value": "Organic Search" }
                }
            })
        );
    }
}
