//! Integration tests for fieldcheck

use fieldcheck::{FieldLevel, StructLevel, Validate, ValidationError, Validator, ValidatorConfig, ValidatorError};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Validate)]
struct LoginRequest {
    #[validate("required,email")]
    username: String,
    #[validate("required,min=5,max=64")]
    password: String,
    #[validate("required,alphanum")]
    full_name: String,
}

#[derive(Clone, Validate)]
struct AddressRequest {
    #[validate("required,alphanum")]
    street: String,
    #[validate("required,alphanum")]
    city: String,
}

#[derive(Validate)]
struct RegisterRequest {
    #[validate("required,email")]
    username: String,
    #[validate("required,min=5,max=64")]
    password: String,
    #[validate("required,min=5,max=64,eqfield=password")]
    confirm_password: String,
    address: AddressRequest,
    #[validate("required,dive")]
    addresses: Vec<AddressRequest>,
}

fn address(street: &str, city: &str) -> AddressRequest {
    AddressRequest {
        street: street.to_string(),
        city: city.to_string(),
    }
}

fn register_request() -> RegisterRequest {
    RegisterRequest {
        username: "andi@mail.com".to_string(),
        password: "password".to_string(),
        confirm_password: "password".to_string(),
        address: address("Test", "TestCity"),
        addresses: vec![address("Test", "TestCity")],
    }
}

fn tags(errors: &[ValidationError]) -> Vec<(&str, &str)> {
    errors.iter().map(|e| (e.field.as_str(), e.tag.as_str())).collect()
}

#[test]
fn test_validator_creation() {
    let validator = Validator::new();
    assert!(validator.registry().rule("required").is_some());
    assert_eq!(validator.config().max_depth, fieldcheck::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_var() {
    let validator = Validator::new();

    assert!(validator.var("andi", "required,alphanum").unwrap().is_empty());
    assert!(validator.var("0815900141", "required,numeric,min=5,max=10").unwrap().is_empty());

    let errors = validator.var("0815900141999", "required,numeric,min=5,max=10").unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].tag, "max");
    assert_eq!(errors.errors[0].param.as_deref(), Some("10"));
}

#[test]
fn test_var_with_value() {
    let validator = Validator::new();

    assert!(validator.var_with_value("password", "password", "eqfield").unwrap().is_empty());
    assert_eq!(validator.var_with_value("password", "secret", "eqfield").unwrap().len(), 1);
    assert!(validator.var_with_value("password", "secret", "nefield").unwrap().is_empty());
}

#[test]
fn test_struct_valid() {
    let validator = Validator::new();
    let request = LoginRequest {
        username: "andi@mail.com".to_string(),
        password: "password".to_string(),
        full_name: "andi".to_string(),
    };

    let errors = validator.validate(&request).unwrap();
    assert!(errors.is_empty(), "unexpected errors: {}", errors);
    assert!(errors.into_result().is_ok());
}

#[test]
fn test_struct_errors() {
    let validator = Validator::new();
    let request = LoginRequest {
        username: "andi".to_string(),
        password: "asd".to_string(),
        full_name: "andi soraya@".to_string(),
    };

    let errors = validator.validate(&request).unwrap();
    assert_eq!(
        tags(&errors.errors),
        [("username", "email"), ("password", "min"), ("full_name", "alphanum")]
    );

    let password = &errors.errors[1];
    assert_eq!(password.namespace, "LoginRequest.password");
    assert_eq!(password.param.as_deref(), Some("5"));
    assert_eq!(password.value, serde_json::json!("asd"));
    assert_eq!(
        errors.errors[0].to_string(),
        "Key: 'LoginRequest.username' Error:Field validation for 'username' failed on the 'email' tag"
    );
}

#[test]
fn test_cross_field() {
    let validator = Validator::new();
    assert!(validator.validate(&register_request()).unwrap().is_empty());

    let mut request = register_request();
    request.confirm_password = "passw0rd".to_string();

    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("confirm_password", "eqfield")]);
    assert_eq!(errors.errors[0].param.as_deref(), Some("password"));
}

#[test]
fn test_nested_struct() {
    let validator = Validator::new();
    let mut request = register_request();
    request.address.city = "Test City".to_string();

    let errors = validator.validate(&request).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors[0].namespace, "RegisterRequest.address.city");
    assert_eq!(errors.errors[0].field, "address.city");
    assert_eq!(errors.errors[0].name, "city");
}

#[test]
fn test_nested_slice_dive() {
    let validator = Validator::new();
    let mut request = register_request();
    request.addresses.push(address("", "Bekasi"));

    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("addresses[1].street", "required")]);
    assert_eq!(errors.errors[0].namespace, "RegisterRequest.addresses[1].street");

    request.addresses.clear();
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("addresses", "required")]);
}

#[derive(Validate)]
struct HobbyRequest {
    #[validate("required,email")]
    username: String,
    #[validate("required,dive,alphanum,min=1")]
    hobbies: Vec<String>,
}

#[test]
fn test_basic_collection_dive() {
    let validator = Validator::new();
    let mut request = HobbyRequest {
        username: "andi@mail.com".to_string(),
        hobbies: vec!["Coding".to_string()],
    };
    assert!(validator.validate(&request).unwrap().is_empty());

    request.hobbies.push("Gaming!".to_string());
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("hobbies[1]", "alphanum")]);
    assert_eq!(errors.errors[0].name, "hobbies[1]");
    assert_eq!(errors.errors[0].struct_field, "hobbies");
    assert_eq!(errors.errors[0].value, serde_json::json!("Gaming!"));
}

#[derive(Validate)]
struct School {
    #[validate("required,min=8")]
    name: String,
}

#[derive(Validate)]
struct SchoolRequest {
    #[validate("dive,keys,required,min=2,endkeys,required")]
    schools: HashMap<String, School>,
}

#[test]
fn test_map_of_structs() {
    let validator = Validator::new();
    let mut request = SchoolRequest {
        schools: HashMap::from([(
            "SMA".to_string(),
            School {
                name: "SMA 1 Bekasi".to_string(),
            },
        )]),
    };
    assert!(validator.validate(&request).unwrap().is_empty());

    request.schools = HashMap::from([(
        "S".to_string(),
        School {
            name: "SMA 2".to_string(),
        },
    )]);
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("schools[S]", "min"), ("schools[S].name", "min")]);
    assert_eq!(errors.errors[1].namespace, "SchoolRequest.schools[S].name");
}

#[derive(Validate)]
struct ScoreRequest {
    #[validate("dive,keys,required,min=2,endkeys,required,gt=0")]
    scores: HashMap<String, i32>,
}

#[test]
fn test_basic_map() {
    let validator = Validator::new();
    let mut request = ScoreRequest {
        scores: HashMap::from([("Math".to_string(), 10)]),
    };
    assert!(validator.validate(&request).unwrap().is_empty());

    request.scores = HashMap::from([("Math".to_string(), -1)]);
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("scores[Math]", "gt")]);

    request.scores = HashMap::from([("M".to_string(), 0)]);
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("scores[M]", "min"), ("scores[M]", "required")]);
    // Key failures share the entry path and carry the key as their value
    assert_eq!(errors.errors[0].value, serde_json::json!("M"));
    assert_eq!(errors.errors[1].value, serde_json::json!(0));
}

#[derive(Validate)]
struct Seller {
    #[validate("varchar,min=5")]
    id: String,
    #[validate("varchar")]
    name: String,
    #[validate("varchar")]
    owner: String,
    #[validate("varchar")]
    slogan: String,
}

#[test]
fn test_alias() {
    let mut validator = Validator::new();
    validator.register_alias("varchar", "required,max=255").unwrap();

    let seller = Seller {
        id: "123".to_string(),
        name: String::new(),
        owner: String::new(),
        slogan: String::new(),
    };

    let errors = validator.validate(&seller).unwrap();
    assert_eq!(
        tags(&errors.errors),
        [("id", "min"), ("name", "varchar"), ("owner", "varchar"), ("slogan", "varchar")]
    );
    assert_eq!(errors.errors[1].actual_tag, "required");
    assert_eq!(
        errors.errors[1].to_string(),
        "Key: 'Seller.name' Error:Field validation for 'name' failed on the 'varchar' tag"
    );
}

#[test]
fn test_alias_cycle() {
    let mut validator = Validator::new();
    validator.register_alias("ping", "pong").unwrap();
    validator.register_alias("pong", "ping").unwrap();

    assert!(matches!(
        validator.var("x", "ping"),
        Err(ValidatorError::AliasCycle(_))
    ));
}

#[derive(Validate)]
struct UsernameLogin {
    #[validate("required,username")]
    username: String,
    #[validate("required")]
    password: String,
}

#[test]
fn test_custom_rule() {
    let mut validator = Validator::new();
    validator
        .register_rule("username", |fl: &FieldLevel<'_>| {
            Ok(fl
                .field()
                .as_str()
                .is_none_or(|value| value == value.to_uppercase() && value.len() >= 5))
        })
        .unwrap();

    let request = UsernameLogin {
        username: "ABDUL".to_string(),
        password: String::new(),
    };
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("password", "required")]);

    let request = UsernameLogin {
        username: "abdul".to_string(),
        password: "secret".to_string(),
    };
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("username", "username")]);
}

#[derive(Validate)]
struct PinLogin {
    #[validate("required,number")]
    phone: String,
    #[validate("required,pin=6")]
    pin: String,
}

#[derive(Validate)]
struct BrokenPinLogin {
    #[validate("required,pin=six")]
    pin: String,
}

fn pin_validator() -> Validator {
    let mut validator = Validator::new();
    validator
        .register_rule("pin", |fl: &FieldLevel<'_>| {
            let length: usize = fl.param_as()?;
            let value = fl.field().as_str().unwrap_or_default();
            Ok(value.len() == length && value.bytes().all(|b| b.is_ascii_digit()))
        })
        .unwrap();
    validator
}

#[test]
fn test_custom_rule_parameter() {
    let validator = pin_validator();

    let request = PinLogin {
        phone: "0904190424".to_string(),
        pin: "123123".to_string(),
    };
    assert!(validator.validate(&request).unwrap().is_empty());

    let request = PinLogin {
        phone: "+62904190424".to_string(),
        pin: "1231".to_string(),
    };
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("phone", "number"), ("pin", "pin")]);
    assert_eq!(errors.errors[1].param.as_deref(), Some("6"));
}

#[test]
fn test_custom_rule_bad_parameter() {
    let validator = pin_validator();
    let request = BrokenPinLogin {
        pin: "123123".to_string(),
    };

    match validator.validate(&request) {
        Err(ValidatorError::InvalidParam { rule, param, .. }) => {
            assert_eq!(rule, "pin");
            assert_eq!(param, "six");
        }
        other => panic!("expected invalid parameter, got {:?}", other),
    }
}

#[derive(Validate)]
struct OrLogin {
    #[validate("required,email|numeric")]
    username: String,
    #[validate("required")]
    password: String,
}

#[test]
fn test_or_rule() {
    let validator = Validator::new();

    for username in ["12345", "a@b.com"] {
        let request = OrLogin {
            username: username.to_string(),
            password: "ekoo".to_string(),
        };
        assert!(validator.validate(&request).unwrap().is_empty(), "{username} should pass");
    }

    let request = OrLogin {
        username: "abc".to_string(),
        password: "ekoo".to_string(),
    };
    let errors = validator.validate(&request).unwrap();
    assert_eq!(tags(&errors.errors), [("username", "email|numeric")]);
    assert_eq!(errors.errors[0].actual_tag, "email|numeric");
}

#[derive(Validate)]
struct User {
    #[validate("required,field_equals_ignore_case=email|field_equals_ignore_case=phone")]
    username: String,
    #[validate("required,email")]
    email: String,
    #[validate("required,numeric")]
    phone: String,
    #[validate("required")]
    name: String,
}

#[test]
fn test_custom_cross_field_rule() {
    let mut validator = Validator::new();
    validator
        .register_rule("field_equals_ignore_case", |fl: &FieldLevel<'_>| {
            let sibling = fl
                .param_field()
                .ok_or_else(|| ValidatorError::rule(fl.rule(), format!("no field named '{}'", fl.param())))?;
            match (fl.field().as_str(), sibling.value.as_str()) {
                (Some(value), Some(other)) => Ok(value.eq_ignore_ascii_case(other)),
                _ => Ok(false),
            }
        })
        .unwrap();

    let mut user = User {
        username: "EKO@example.com".to_string(),
        email: "eko@example.com".to_string(),
        phone: "089999999999".to_string(),
        name: "Eko".to_string(),
    };
    assert!(validator.validate(&user).unwrap().is_empty());

    user.username = "089999999999".to_string();
    assert!(validator.validate(&user).unwrap().is_empty());

    user.username = "eko".to_string();
    let errors = validator.validate(&user).unwrap();
    assert_eq!(
        tags(&errors.errors),
        [("username", "field_equals_ignore_case=email|field_equals_ignore_case=phone")]
    );
}

#[derive(Validate)]
struct SignupRequest {
    #[validate("required")]
    username: String,
    #[validate("required,email")]
    email: String,
    #[validate("required,numeric")]
    phone: String,
    #[validate("required")]
    password: String,
}

fn signup(username: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        email: "eko@example.com".to_string(),
        phone: "089923942934".to_string(),
        password: "rahasia".to_string(),
    }
}

#[test]
fn test_struct_level_hook() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut validator = Validator::new();
    let counter = Arc::clone(&calls);
    validator.register_struct_hook::<SignupRequest, _>(move |request: &SignupRequest, level: &mut StructLevel<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        if request.username != request.email && request.username != request.phone {
            level.report_error("username", "username", "username", "");
        }
    });

    assert!(validator.validate(&signup("089923942934")).unwrap().is_empty());
    assert!(validator.validate(&signup("eko@example.com")).unwrap().is_empty());

    let errors = validator.validate(&signup("eko")).unwrap();
    assert_eq!(tags(&errors.errors), [("username", "username")]);
    assert_eq!(errors.errors[0].namespace, "SignupRequest.username");
    assert_eq!(errors.errors[0].value, serde_json::json!("eko"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Field failures suppress the hook
    let errors = validator.validate(&signup("")).unwrap();
    assert_eq!(tags(&errors.errors), [("username", "required")]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[derive(Validate)]
struct Profile {
    #[validate("required")]
    nickname: Option<String>,
    #[validate("omitempty,url")]
    website: Option<String>,
    #[validate("email")]
    backup_email: Option<String>,
    #[validate("omitempty,min=3")]
    bio: String,
}

#[test]
fn test_optional_and_omitempty() {
    let validator = Validator::new();

    let profile = Profile {
        nickname: None,
        website: None,
        backup_email: None,
        bio: String::new(),
    };
    let errors = validator.validate(&profile).unwrap();
    assert_eq!(tags(&errors.errors), [("nickname", "required")]);
    assert_eq!(errors.errors[0].value, serde_json::Value::Null);

    let profile = Profile {
        nickname: Some("andi".to_string()),
        website: Some("not a url".to_string()),
        backup_email: Some("andi@mail.com".to_string()),
        bio: "hi".to_string(),
    };
    let errors = validator.validate(&profile).unwrap();
    assert_eq!(tags(&errors.errors), [("website", "url"), ("bio", "min")]);
}

struct Session;

#[derive(Validate)]
struct Account {
    #[validate(rules = "required,email", rename = "Email")]
    email: String,
    #[validate("eqfield=Email")]
    confirm_email: String,
    #[validate(skip)]
    #[allow(dead_code)]
    session: Session,
    #[validate("-")]
    notes: String,
}

#[test]
fn test_rename_and_skip() {
    let validator = Validator::new();
    let mut account = Account {
        email: "andi".to_string(),
        confirm_email: "andi".to_string(),
        session: Session,
        notes: String::new(),
    };

    let errors = validator.validate(&account).unwrap();
    assert_eq!(tags(&errors.errors), [("Email", "email")]);
    assert_eq!(errors.errors[0].struct_field, "email");

    account.email = "andi@mail.com".to_string();
    let errors = validator.validate(&account).unwrap();
    assert_eq!(tags(&errors.errors), [("confirm_email", "eqfield")]);
    assert_eq!(account.fields().len(), 3);
}

#[derive(Validate)]
struct Chain {
    #[validate("required")]
    label: String,
    next: Option<Box<Chain>>,
}

fn chain(length: usize) -> Chain {
    let mut node = Chain {
        label: "tail".to_string(),
        next: None,
    };
    for _ in 1..length {
        node = Chain {
            label: "link".to_string(),
            next: Some(Box::new(node)),
        };
    }
    node
}

#[test]
fn test_depth_limit() {
    let validator = Validator::with_config(ValidatorConfig::default().with_max_depth(16)).unwrap();

    assert!(validator.validate(&chain(10)).unwrap().is_empty());
    assert!(matches!(
        validator.validate(&chain(40)),
        Err(ValidatorError::DepthExceeded { max: 16, .. })
    ));
}

#[derive(Validate)]
struct Broken {
    #[validate("required,bogus")]
    name: String,
}

#[test]
fn test_unknown_rule_is_config_error() {
    let validator = Validator::new();
    let broken = Broken {
        name: "andi".to_string(),
    };

    match validator.validate(&broken) {
        Err(ValidatorError::UnknownRule { rule, field }) => {
            assert_eq!(rule, "bogus");
            assert_eq!(field, "name");
        }
        other => panic!("expected unknown rule, got {:?}", other),
    }
    assert!(matches!(
        validator.var("andi", "required,,alphanum"),
        Err(ValidatorError::InvalidTag { .. })
    ));
}

#[test]
fn test_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_depth = 8

[aliases]
varchar = "required,max=255"
"#
    )
    .unwrap();

    let config = ValidatorConfig::from_file(file.path()).unwrap();
    let validator = Validator::with_config(config).unwrap();
    assert_eq!(validator.config().max_depth, 8);

    let seller = Seller {
        id: "seller-1".to_string(),
        name: "Toko".to_string(),
        owner: "Andi".to_string(),
        slogan: String::new(),
    };
    let errors = validator.validate(&seller).unwrap();
    assert_eq!(tags(&errors.errors), [("slogan", "varchar")]);
}

#[test]
fn test_errors_to_json() {
    let validator = Validator::new();
    let errors = validator.var("abc", "required,min=5").unwrap();

    let json = errors.to_json();
    assert_eq!(json["errors"][0]["tag"], "min");
    assert_eq!(json["errors"][0]["param"], "5");
    assert_eq!(json["errors"][0]["value"], "abc");
}

#[derive(Validate)]
struct Contact {
    #[validate("required,email|numeric")]
    phone: u64,
    #[validate("omitempty,alphanum")]
    code: Option<i32>,
}

#[test]
fn test_alternation_over_numeric_kinds() {
    let validator = Validator::new();

    let contact = Contact {
        phone: 12345,
        code: None,
    };
    assert!(validator.validate(&contact).unwrap().is_empty());

    let contact = Contact {
        phone: 12345,
        code: Some(5),
    };
    let errors = validator.validate(&contact).unwrap();
    assert_eq!(tags(&errors.errors), [("code", "alphanum")]);

    assert!(validator.var(&12345u64, "email|numeric").unwrap().is_empty());
    assert_eq!(validator.var(&5i32, "alphanum").unwrap().len(), 1);
}

#[test]
fn test_large_integer_bounds() {
    let validator = Validator::new();

    assert!(validator.var(&9_007_199_254_740_993u64, "gt=9007199254740992").unwrap().is_empty());
    let errors = validator.var(&9_007_199_254_740_993u64, "lte=9007199254740992").unwrap();
    assert_eq!(errors.errors[0].tag, "lte");
    assert!(validator.var(&i64::MAX, "min=9223372036854775807").unwrap().is_empty());
}

#[test]
fn test_omitempty_on_absent_optional() {
    let validator = Validator::new();

    assert!(validator.var(&None::<String>, "omitempty,required").unwrap().is_empty());
    assert_eq!(validator.var(&None::<String>, "required").unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validation() {
    let mut validator = Validator::new();
    validator.register_alias("varchar", "required,max=255").unwrap();
    let validator = Arc::new(validator);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let validator = Arc::clone(&validator);
        tasks.spawn(async move {
            let mut request = register_request();
            if i % 2 == 1 {
                request.address.street = String::new();
            }
            let errors = validator.validate(&request).unwrap();
            (i, errors.len())
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (i, failures) = result.unwrap();
        assert_eq!(failures, i % 2);
    }
}
