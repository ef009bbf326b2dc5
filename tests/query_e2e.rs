use opentsdb_query::{QueryBuilder, QueryError, RateOptions, RateOptionsUpdate};
use serde_json::{json, Value};

#[test]
fn serialize_defaults_with_explicit_resets() {
    let mut query = QueryBuilder::new();
    query
        .set_rate(false)
        .set_aggregator("avg")
        .set_downsample(None)
        .unwrap();
    assert_eq!(query.serialize(), "avg");
}

#[test]
fn serialize_aggregator_only() {
    let mut query = QueryBuilder::new();
    query
        .set_aggregator("sum")
        .set_downsample(None)
        .unwrap()
        .set_rate(false);
    assert_eq!(query.serialize(), "sum");
}

#[test]
fn serialize_with_downsample() {
    let mut query = QueryBuilder::new();
    query
        .set_aggregator("sum")
        .set_downsample(Some("5m-avg"))
        .unwrap()
        .set_rate(false);
    assert_eq!(query.serialize(), "sum:5m-avg");
}

#[test]
fn serialize_rate_without_counter_max() {
    let mut query = QueryBuilder::new();
    query
        .set_aggregator("sum")
        .set_downsample(Some("5m-avg"))
        .unwrap()
        .set_rate(true)
        .set_rate_options(RateOptionsUpdate::new().counter(true).reset_value(5.0))
        .unwrap();
    assert_eq!(query.serialize(), "sum:rate{true,,5}:5m-avg");
}

#[test]
fn serialize_rate_with_counter_max() {
    let mut query = QueryBuilder::new();
    query
        .set_aggregator("sum")
        .set_downsample(Some("5m-avg"))
        .unwrap()
        .set_rate(true)
        .set_rate_options(
            RateOptionsUpdate::new()
                .counter(true)
                .counter_max(Some(5000.0))
                .reset_value(5.0),
        )
        .unwrap();
    assert_eq!(query.serialize(), "sum:rate{true,5000,5}:5m-avg");
}

#[test]
fn serialize_rate_with_default_options() {
    let mut query = QueryBuilder::new();
    query.set_rate(true);
    assert_eq!(query.serialize(), "avg:rate{false,,0}");
}

#[test]
fn aggregator_round_trips_any_string() {
    let mut query = QueryBuilder::new();
    for name in ["avg", "sum", "mimmax", "a b c", "ünïcode"] {
        assert_eq!(query.set_aggregator(name).aggregator(), name);
    }
}

#[test]
fn aggregator_rejects_non_strings() {
    let mut query = QueryBuilder::new();
    let values: Vec<Value> = vec![
        json!(5),
        json!([]),
        json!({}),
        json!(true),
        json!(null),
        json!(-1.5),
    ];
    for value in &values {
        let err = query.set_aggregator_value(value).unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument { field: "aggregator", .. }));
    }
    assert_eq!(query.aggregator(), "avg");
}

#[test]
fn downsample_round_trips() {
    let mut query = QueryBuilder::new();
    for spec in ["5m-avg", "60h-sum", "100ms-max", "1y-min"] {
        assert_eq!(query.set_downsample(Some(spec)).unwrap().downsample(), Some(spec));
    }
    assert_eq!(query.set_downsample(None).unwrap().downsample(), None);
}

#[test]
fn downsample_rejects_malformed_specs() {
    let mut query = QueryBuilder::new();
    for spec in ["5q-avg", "5m avg", "5mavg", "5m-Avg", "avg", "5m-"] {
        let err = query.set_downsample(Some(spec)).unwrap_err();
        assert!(err.is_invalid_format(), "{spec} should fail the format check");
    }
    for value in [json!(5), json!([]), json!({}), json!(false)] {
        let err = query.set_downsample_value(&value).unwrap_err();
        assert!(err.is_invalid_argument());
    }
    assert_eq!(query.downsample(), None);
}

#[test]
fn rate_options_defaults() {
    let opts = QueryBuilder::new().rate_options();
    assert_eq!(
        opts,
        RateOptions {
            counter: false,
            counter_max: None,
            reset_value: 0.0,
        }
    );
}

#[test]
fn rate_options_read_is_a_copy() {
    let mut query = QueryBuilder::new();
    query
        .set_rate_options(RateOptionsUpdate::new().counter_max(Some(100.0)))
        .unwrap();

    let mut opts = query.rate_options();
    opts.counter_max = None;
    opts.counter = true;

    assert_eq!(query.rate_options().counter_max, Some(100.0));
    assert!(!query.rate_options().counter);
}

#[test]
fn rate_options_reset_value_only() {
    let mut query = QueryBuilder::new();
    query
        .set_rate_options(RateOptionsUpdate::new().counter(true).counter_max(Some(64.0)))
        .unwrap();
    query
        .set_rate_options_value(&json!({"resetValue": 5}))
        .unwrap();

    let opts = query.rate_options();
    assert!(opts.counter);
    assert_eq!(opts.counter_max, Some(64.0));
    assert_eq!(opts.reset_value, 5.0);
}

#[test]
fn rate_options_reject_nan() {
    let mut query = QueryBuilder::new();
    assert!(query
        .set_rate_options(RateOptionsUpdate::new().counter_max(Some(f64::NAN)))
        .unwrap_err()
        .is_invalid_argument());
    assert!(query
        .set_rate_options(RateOptionsUpdate::new().reset_value(f64::NAN))
        .unwrap_err()
        .is_invalid_argument());
    assert_eq!(query.rate_options(), RateOptions::default());
}

#[test]
fn json_description_matches_builder() {
    let mut built = QueryBuilder::new();
    built
        .set_aggregator("sum")
        .set_downsample(Some("5m-avg"))
        .unwrap()
        .set_rate(true)
        .set_rate_options(
            RateOptionsUpdate::new()
                .counter(true)
                .counter_max(Some(5000.0))
                .reset_value(5.0),
        )
        .unwrap();

    let loaded = QueryBuilder::from_json(
        r#"{
            "aggregator": "sum",
            "downsample": "5m-avg",
            "rate": true,
            "rateOptions": {"counter": true, "counterMax": 5000, "resetValue": 5}
        }"#,
    )
    .unwrap();

    assert_eq!(loaded, built);
    assert_eq!(loaded.serialize(), built.serialize());
}
