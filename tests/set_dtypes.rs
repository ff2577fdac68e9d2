use homecredit_props::config::{Config, KeyColumns};
use homecredit_props::schema::set_dtypes;
use homecredit_props::types::{DataType, Field, Schema};

fn untyped(names: &[&str]) -> Schema {
    Schema::new(names.iter().map(|n| Field::new(*n, DataType::Null)).collect())
}

#[test]
fn suffixes_map_to_dtypes() {
    let keys = KeyColumns {
        integer: vec!["id".to_string()],
        date: vec![],
    };
    let out = set_dtypes(untyped(&["amt_P", "id", "flag_M"]), &keys);

    assert_eq!(
        out,
        Schema::new(vec![
            Field::new("amt_P", DataType::Float64),
            Field::new("id", DataType::Int64),
            Field::new("flag_M", DataType::Utf8),
        ])
    );
}

#[test]
fn default_key_columns_override_suffix() {
    let keys = Config::default().key_columns();
    let schema = Schema::new(vec![
        Field::new("case_id", DataType::Float64),
        Field::new("WEEK_NUM", DataType::Other("i32".to_string())),
        Field::new("num_group1", DataType::Float64),
        Field::new("num_group2", DataType::Float64),
        Field::new("date_decision", DataType::Utf8),
        Field::new("annuity_780A", DataType::Int64),
        Field::new("birth_259D", DataType::Utf8),
    ]);

    let out = set_dtypes(schema, &keys);
    let dtypes: Vec<_> = out.fields.iter().map(|f| f.data_type.clone()).collect();
    assert_eq!(
        dtypes,
        vec![
            DataType::Int64,
            DataType::Int64,
            DataType::Int64,
            DataType::Int64,
            DataType::Date,
            DataType::Float64,
            DataType::Date,
        ]
    );
}

#[test]
fn t_and_l_columns_keep_inferred_dtype() {
    let keys = Config::default().key_columns();
    let schema = Schema::new(vec![
        Field::new("description_5085714M", DataType::Null),
        Field::new("isbidproduct_1095L", DataType::Bool),
        Field::new("riskassesment_940T", DataType::Float64),
        Field::new("lastcrtype", DataType::Utf8),
    ]);

    let out = set_dtypes(schema, &keys);
    assert_eq!(out.data_type("description_5085714M"), Some(&DataType::Utf8));
    assert_eq!(out.data_type("isbidproduct_1095L"), Some(&DataType::Bool));
    assert_eq!(out.data_type("riskassesment_940T"), Some(&DataType::Float64));
    assert_eq!(out.data_type("lastcrtype"), Some(&DataType::Utf8));
    assert_eq!(
        out.field_names().collect::<Vec<_>>(),
        vec!["description_5085714M", "isbidproduct_1095L", "riskassesment_940T", "lastcrtype"]
    );
}
