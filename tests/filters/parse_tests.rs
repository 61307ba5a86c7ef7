// tests/filters/parse_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::{books, params, reviews};
    use flux_admission::{QueryFilterSpec, ValidationErrors};

    #[test]
    fn absent_parameters_take_defaults() {
        let defaults = books();
        let spec = QueryFilterSpec::parse(&params(&[]), &defaults);
        assert_eq!(spec.page(), 1);
        assert_eq!(spec.page_size(), 10);
        assert_eq!(spec.sort(), "id");

        let filters = spec.validate().unwrap();
        assert_eq!((filters.limit(), filters.offset()), (10, 0));
    }

    #[test]
    fn explicit_parameters_override_defaults() {
        let defaults = books().page_size(20).sort("title");
        assert!(defaults.validate().is_ok());

        let spec = QueryFilterSpec::parse(&params(&[("page", "4"), ("page_size", "25")]), &defaults);
        let filters = spec.validate().unwrap();
        assert_eq!(filters.page(), 4);
        assert_eq!(filters.limit(), 25);
        assert_eq!(filters.offset(), 75);
        assert_eq!(filters.sort_column(), "title");

        let spec = QueryFilterSpec::parse(&params(&[]), &defaults);
        assert_eq!(spec.validate().unwrap().limit(), 20);
    }

    #[test]
    fn non_numeric_values_are_reported_not_coerced() {
        let defaults = books();
        let spec = QueryFilterSpec::parse(&params(&[("page", "two"), ("page_size", "1.5")]), &defaults);
        let errors = spec.validate().unwrap_err();

        assert_eq!(errors.get("page"), Some("must be an integer value"));
        assert_eq!(errors.get("page_size"), Some("must be an integer value"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let defaults = books();
        let spec = QueryFilterSpec::parse(&params(&[("page", ""), ("sort", "")]), &defaults);
        assert_eq!(spec.page(), 1);
        assert_eq!(spec.sort(), "id");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn endpoint_filters_share_the_error_report() {
        // list reviews: ?rating=high&author=le%20guin&page=0
        let defaults = reviews();
        let query = params(&[("rating", "high"), ("author", "le guin"), ("page", "0")]);

        let mut errors = ValidationErrors::new();
        let rating = query.integer("rating", 0, &mut errors);
        let author = query.string("author", "");
        if let Err(filter_errors) = QueryFilterSpec::parse(&query, &defaults).validate() {
            errors.merge(filter_errors);
        }

        assert_eq!(rating, 0);
        assert_eq!(author, "le guin");
        assert_eq!(
            errors.iter().collect::<Vec<_>>(),
            vec![
                ("rating", "must be an integer value"),
                ("page", "must be greater than zero"),
            ]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "filter defaults must be validated at startup")]
    fn unvalidated_defaults_are_caught_in_debug_builds() {
        // "rating" is not sortable on books
        let defaults = books().sort("rating");
        let _ = QueryFilterSpec::parse(&params(&[]), &defaults);
    }
}
