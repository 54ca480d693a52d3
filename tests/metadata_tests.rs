use jsrs::{parse, record, ErrorKind, Metadata, Value};

const PERSON_META: &str = r#"{
    name: 'string',
    passport: 'string',
    birth: { date: 'Date', place: 'string' },
    contacts: {
        email: 'string',
        phone: 'string',
        address: {
            country: 'string', city: 'string', zip: 'number',
            street: 'string', building: 'string', floor: 'number', room: 'number'
        }
    }
}"#;

const PERSON_DATA: &str = r#"[
    'Marcus Aurelius', 'AE127095',
    ['1990-02-15', 'Rome'],
    ['marcus@aurelius.it', '+380505551234',
        ['Ukraine', 'Kiev', '03056', 'Pobedy', '37', '1', '158']]
]"#;

#[test]
fn test_decode_nested_person() {
    let meta = Metadata::parse(PERSON_META).unwrap();
    let person = meta.decode_str(PERSON_DATA).unwrap();

    assert_eq!(person["name"].as_str(), "Marcus Aurelius");
    assert_eq!(person["birth"]["place"].as_str(), "Rome");
    assert_eq!(person["contacts"]["address"]["room"].as_str(), "158");

    let expected = parse(
        r#"{
        name:"Marcus Aurelius",
        passport:"AE127095",
        birth:{date:"1990-02-15",place:"Rome"},
        contacts:{
            email:"marcus@aurelius.it",
            phone:"+380505551234",
            address:{country:"Ukraine",city:"Kiev",zip:"03056",street:"Pobedy",building:"37",floor:"1",room:"158"}
        }
    }"#,
    )
    .unwrap();
    assert_eq!(person.stringify(), expected.stringify());
}

#[test]
fn test_encode_is_inverse_of_decode() {
    let meta = Metadata::parse(PERSON_META).unwrap();
    let data = parse(PERSON_DATA).unwrap();
    let person = meta.decode(&data).unwrap();
    assert_eq!(meta.encode(&person).unwrap(), data);
}

#[test]
fn test_partial_records() {
    let meta = Metadata::parse(PERSON_META).unwrap();
    let person = meta.decode_str("['Marcus Aurelius',,['1990-02-15']]").unwrap();

    assert!(person["passport"].is_undefined());
    assert!(person["birth"]["place"].is_undefined());
    assert!(person["contacts"].is_undefined());
    assert_eq!(person.as_object().len(), 4);
}

#[test]
fn test_encode_record_built_in_code() {
    let meta = Metadata::parse("{id:'number',point:{x:'number',y:'number'},label:'string'}").unwrap();
    let record = record!({ label: "origin", point: { y: 0, x: 0 } });
    assert_eq!(meta.encode(&record).unwrap().stringify(), "[,[0,0],\"origin\"]");
}

#[test]
fn test_mismatches() {
    let meta = Metadata::parse("{a:1,b:{c:1}}").unwrap();

    let cases = ["{a:1}", "[1,[2],3]", "[1,2]", "[1,[2,3]]", "'text'"];
    for text in cases {
        let err = meta.decode_str(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Metadata, "decoding {}", text);
    }

    assert_eq!(meta.encode(&Value::Null).unwrap_err().kind(), ErrorKind::Metadata);
    assert_eq!(
        Metadata::new(record!(["a", "b"])).unwrap_err().kind(),
        ErrorKind::Metadata
    );
}

#[test]
fn test_metadata_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Metadata>();
    assert_send_sync::<Value>();
}
