//! Translation of store-independent filters into Firestore structured queries.
//!
//! Firestore has no substring matching and its ordering drops documents that
//! lack the ordered field, so location matching and salary ordering stay in
//! process. Equality and salary bounds go to the server.

use jobboard_models::JobQuery;

use crate::types::{Filter, StructuredQuery, ToFirestoreValue};

/// Firestore field paths of stored records.
pub mod fields {
    pub const HR_EMAIL: &str = "hr_email";
    pub const SALARY_MIN: &str = "salaryRange.min";
    pub const SALARY_MAX: &str = "salaryRange.max";
    pub const APPLICATION_COUNT: &str = "applicationCount";
    pub const JOB_ID: &str = "job_id";
    pub const APPLICANT_EMAIL: &str = "applicant_email";
    pub const STATUS: &str = "status";
}

const EQUAL: &str = "EQUAL";
const GREATER_THAN_OR_EQUAL: &str = "GREATER_THAN_OR_EQUAL";
const LESS_THAN_OR_EQUAL: &str = "LESS_THAN_OR_EQUAL";

/// Combine filters with AND. A single filter is used as is.
fn conjunction(mut filters: Vec<Filter>) -> Option<Filter> {
    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(Filter::and(filters)),
    }
}

/// Server-side part of a job listing query.
pub fn job_list_query(collection: &str, query: &JobQuery) -> StructuredQuery {
    let mut filters = Vec::new();

    if let Some(email) = &query.hr_email {
        filters.push(Filter::field(fields::HR_EMAIL, EQUAL, email.to_firestore_value()));
    }

    if let Some(band) = &query.salary_band {
        filters.push(Filter::field(
            fields::SALARY_MIN,
            GREATER_THAN_OR_EQUAL,
            band.min.to_firestore_value(),
        ));
        filters.push(Filter::field(
            fields::SALARY_MAX,
            LESS_THAN_OR_EQUAL,
            band.max.to_firestore_value(),
        ));
    }

    let structured = StructuredQuery::collection(collection);
    match conjunction(filters) {
        Some(filter) => structured.filter(filter),
        None => structured,
    }
}

/// Equality query on one string field.
pub fn field_equals(collection: &str, field: &str, value: &str) -> StructuredQuery {
    StructuredQuery::collection(collection).filter(Filter::field(field, EQUAL, value.to_firestore_value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unfiltered_query_has_no_where() {
        let query = job_list_query("jobs", &JobQuery::all().with_location("dhaka").sorted_by_salary());
        assert!(query.r#where.is_none());
        assert!(query.order_by.is_none());
        assert_eq!(query.from[0].collection_id, "jobs");
    }

    #[test]
    fn test_single_filter_is_not_wrapped() {
        let query = job_list_query("jobs", &JobQuery::all().with_hr_email("hr@x.com"));
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value["where"],
            json!({
                "fieldFilter": {
                    "field": {"fieldPath": "hr_email"},
                    "op": "EQUAL",
                    "value": {"stringValue": "hr@x.com"}
                }
            })
        );
    }

    #[test]
    fn test_salary_band_and_email_form_composite_and() {
        let query = job_list_query(
            "jobs",
            &JobQuery::all().with_hr_email("hr@x.com").with_salary_band(50000, 90000),
        );
        let value = serde_json::to_value(&query).unwrap();
        let composite = &value["where"]["compositeFilter"];

        assert_eq!(composite["op"], "AND");
        assert_eq!(composite["filters"].as_array().unwrap().len(), 3);
        assert_eq!(composite["filters"][1]["fieldFilter"]["field"]["fieldPath"], "salaryRange.min");
        assert_eq!(composite["filters"][1]["fieldFilter"]["op"], "GREATER_THAN_OR_EQUAL");
        assert_eq!(composite["filters"][1]["fieldFilter"]["value"], json!({"integerValue": "50000"}));
        assert_eq!(composite["filters"][2]["fieldFilter"]["op"], "LESS_THAN_OR_EQUAL");
    }

    #[test]
    fn test_field_equals() {
        let query = field_equals("applications", fields::JOB_ID, "j1");
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["where"]["fieldFilter"]["field"]["fieldPath"], "job_id");
        assert_eq!(value["from"][0]["collectionId"], "applications");
    }
}
