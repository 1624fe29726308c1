use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use yamlish::{
    from_str, from_str_with_options, schema, schema_enum, to_string, to_string_with_options,
    Converter, Error, NameStyle, Options, ScalarKind, StringStyle, TypeDescriptor, Value,
};

schema_enum! {
    pub enum Difficulty {
        Peaceful,
        Easy,
        Normal,
        Hard,
    }
}

schema! {
    pub struct WorldConfig {
        pub seed: i64 = 0,
        pub difficulty: Difficulty = Difficulty::Normal,
        pub generate_structures: bool = true,
    }
}

schema! {
    pub struct Messages {
        pub motd: String = "Welcome, {player}!".to_string()
            => with_placeholders(&["player"]),
        pub goodbye: String = "See you soon".to_string(),
    }
}

schema! {
    pub struct ServerConfig {
        pub host: String = "localhost".to_string()
            => comment_same_line("no protocol prefix"),
        pub port: u16 = 25565,
        pub max_players: u32 = 20 => with_fallback_keys(&["slots"]),
        pub operators: Vec<String> = Vec::new(),
        pub worlds: IndexMap<String, WorldConfig> = IndexMap::new(),
        pub messages: Messages = Messages::default(),
        pub version: String = "1.0.0".to_string() => read_only(),
    }
}

fn populated_config() -> ServerConfig {
    let mut worlds = IndexMap::new();
    worlds.insert(
        "overworld".to_string(),
        WorldConfig {
            seed: 4242,
            difficulty: Difficulty::Hard,
            generate_structures: true,
        },
    );
    worlds.insert(
        "nether".to_string(),
        WorldConfig {
            seed: -7,
            difficulty: Difficulty::Easy,
            generate_structures: false,
        },
    );
    ServerConfig {
        host: "play.example.org".to_string(),
        port: 19132,
        max_players: 100,
        operators: vec!["steve".to_string(), "alex".to_string()],
        worlds,
        messages: Messages {
            motd: "Hi {player}, enjoy your stay".to_string(),
            goodbye: "Bye {player}".to_string(),
        },
        version: "1.0.0".to_string(),
    }
}

#[test]
fn default_config_round_trips() {
    let config = ServerConfig::default();
    let text = to_string(&config).unwrap();
    println!("default config:\n{text}");

    let back = from_str::<ServerConfig>(&text).unwrap();
    assert_eq!(back.value, config);
    assert!(!back.backup_preferred);
}

#[test]
fn populated_config_round_trips() {
    let config = populated_config();
    let text = to_string(&config).unwrap();
    println!("populated config:\n{text}");

    let back = from_str::<ServerConfig>(&text).unwrap().value;
    assert_eq!(back, config);
}

#[test]
fn output_carries_comments() {
    schema! {
        struct Connection {
            host: String = "localhost".to_string()
                => comment_same_line("no protocol prefix"),
            port: u16 = 25565
                => comment_prepend(&["Connection settings"]).with_blank_lines(1),
        }
    }

    let text = to_string(&Connection::default()).unwrap();
    assert_eq!(
        text,
        "host: localhost # no protocol prefix\n\n# Connection settings\nport: 25565\n"
    );

    let back = from_str::<Connection>(&text).unwrap().value;
    assert_eq!(back, Connection::default());
}

#[test]
fn missing_keys_keep_defaults() {
    let loaded = from_str::<ServerConfig>("port: 8080\n").unwrap().value;
    assert_eq!(loaded.port, 8080);
    assert_eq!(loaded.host, "localhost");
    assert_eq!(loaded.max_players, 20);
    assert_eq!(loaded.messages.motd, "Welcome, {player}!");
}

#[test]
fn fallback_keys_match_on_read() {
    let loaded = from_str::<ServerConfig>("slots: 64\n").unwrap();
    assert_eq!(loaded.value.max_players, 64);
    // A fallback key is a known key, not a stray one.
    assert!(!loaded.backup_preferred);

    // The fallback name is never written back.
    let text = to_string(&loaded.value).unwrap();
    assert!(text.contains("max-players: 64"));
    assert!(!text.contains("slots"));
}

#[test]
fn read_only_fields_are_never_assigned() {
    let loaded = from_str::<ServerConfig>("version: 9.9.9\nport: 1024\n")
        .unwrap()
        .value;
    assert_eq!(loaded.version, "1.0.0");
    assert_eq!(loaded.port, 1024);

    // But the field still appears in output.
    let text = to_string(&loaded).unwrap();
    assert!(text.contains("version: 1.0.0"));
}

#[test]
fn unknown_keys_are_skipped_with_backup_preference() {
    let input = "port: 1024\nlegacy-section:\n  a: 1\n  b: 2\nhost: example.org\n";
    let loaded = from_str::<ServerConfig>(input).unwrap();
    assert!(loaded.backup_preferred);
    assert_eq!(loaded.value.port, 1024);
    assert_eq!(loaded.value.host, "example.org");
}

#[test]
fn enums_resolve_case_insensitively() {
    let input = "worlds:\n  main:\n    seed: 1\n    difficulty: hard\n";
    let loaded = from_str::<ServerConfig>(input).unwrap().value;
    assert_eq!(loaded.worlds["main"].difficulty, Difficulty::Hard);
}

#[test]
fn unknown_enum_values_fail() {
    let input = "worlds:\n  main:\n    difficulty: impossible\n";
    let result = from_str::<ServerConfig>(input);
    assert!(matches!(result, Err(Error::UnknownEnumValue { .. })));
}

#[test]
fn node_name_style_is_configurable() {
    let options = Options::new().with_node_name_style(NameStyle::Camel);
    let text = to_string_with_options(&ServerConfig::default(), &options).unwrap();
    assert!(text.contains("maxPlayers: 20"));

    let back = from_str_with_options::<ServerConfig>(&text, &options)
        .unwrap()
        .value;
    assert_eq!(back, ServerConfig::default());
}

#[test]
fn block_styles_survive_round_trips() {
    schema! {
        struct Banner {
            motd: String = String::new() => with_style(StringStyle::LiteralAutoClipped),
        }
    }

    let banner = Banner {
        motd: "line one\nline two\n".to_string(),
    };
    let text = to_string(&banner).unwrap();
    assert_eq!(text, "motd: |\n  line one\n  line two\n");

    let back = from_str::<Banner>(&text).unwrap().value;
    assert_eq!(back, banner);
}

#[test]
fn placeholders_are_registered_by_path() {
    let input = "messages:\n  motd: 'Greetings, {player}'\n";
    let loaded = from_str::<ServerConfig>(input).unwrap();
    assert!(loaded.placeholders.contains("messages.motd"));

    let rendered = loaded
        .placeholders
        .replace_str("messages.motd", &loaded.value.messages.motd, &["Steve"])
        .unwrap();
    assert_eq!(rendered, "Greetings, Steve");
}

/// Stores an epoch day count as a calendar date in the document.
struct DateConverter;

impl Converter for DateConverter {
    fn model_id(&self) -> &'static str {
        "date"
    }

    fn document_id(&self) -> &'static str {
        "string"
    }

    fn document_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::String)
    }

    fn deserialize(&self, value: Value) -> yamlish::Result<Value> {
        let Value::String(text) = value else {
            return Err(Error::type_mismatch("string", value.kind_name()));
        };
        let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map_err(|e| Error::custom(format!("invalid date {text:?}: {e}")))?;
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        Ok(Value::from((date - epoch).num_days()))
    }

    fn serialize(&self, value: Value) -> yamlish::Result<Value> {
        let Some(days) = value.as_i64() else {
            return Err(Error::type_mismatch("integer", value.kind_name()));
        };
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let date = epoch + Days::new(days as u64);
        Ok(Value::String(date.format("%Y-%m-%d").to_string()))
    }
}

#[test]
fn converters_change_the_document_representation() {
    schema! {
        struct License {
            expires: i64 = 0 => with_type_id("date"),
        }
    }

    let options = Options::new().with_converter(DateConverter);
    let license = License { expires: 19723 };
    let text = to_string_with_options(&license, &options).unwrap();
    assert_eq!(text, "expires: 2024-01-01\n");

    let back = from_str_with_options::<License>(&text, &options)
        .unwrap()
        .value;
    assert_eq!(back.expires, 19723);
}

#[test]
fn sequences_of_composites_round_trip() {
    schema! {
        struct Waypoint {
            name: String = String::new(),
            x: i64 = 0,
            y: i64 = 0,
        }
    }
    schema! {
        struct Atlas {
            waypoints: Vec<Waypoint> = Vec::new(),
        }
    }

    let atlas = Atlas {
        waypoints: vec![
            Waypoint {
                name: "spawn".to_string(),
                x: 0,
                y: 64,
            },
            Waypoint {
                name: "base".to_string(),
                x: -120,
                y: 70,
            },
        ],
    };
    let text = to_string(&atlas).unwrap();
    println!("atlas:\n{text}");

    let back = from_str::<Atlas>(&text).unwrap().value;
    assert_eq!(back, atlas);
}
