//! Property tests for the round-trip guarantee: whatever a schema writes,
//! reading it back yields an equal value.

use proptest::prelude::*;
use yamlish::{from_str, schema, to_string, Schema};

fn round_trips<T: Schema + PartialEq + std::fmt::Debug>(value: &T) -> bool {
    match to_string(value) {
        Ok(text) => match from_str::<T>(&text) {
            Ok(back) => back.value == *value,
            Err(e) => {
                eprintln!("read failed: {e}\ndocument was:\n{text}");
                false
            }
        },
        Err(e) => {
            eprintln!("write failed: {e}");
            false
        }
    }
}

schema! {
    struct IntegerHolder {
        value: i64 = 0,
    }
}

schema! {
    struct FloatHolder {
        value: f64 = 0.0,
    }
}

schema! {
    struct TextHolder {
        value: String = String::new(),
    }
}

schema! {
    struct ListHolder {
        values: Vec<i64> = Vec::new(),
    }
}

schema! {
    struct OptionalHolder {
        value: Option<i64> = None,
    }
}

schema! {
    struct MixedHolder {
        flag: bool = false,
        count: u32 = 0,
        label: String = String::new(),
    }
}

proptest! {
    #[test]
    fn prop_integers(value in any::<i64>()) {
        let ok = round_trips(&IntegerHolder { value });
        prop_assert!(ok);
    }

    #[test]
    fn prop_finite_floats(value in -1.0e15f64..1.0e15) {
        let ok = round_trips(&FloatHolder { value });
        prop_assert!(ok);
    }

    #[test]
    fn prop_strings(value in any::<String>()) {
        let ok = round_trips(&TextHolder { value });
        prop_assert!(ok);
    }

    #[test]
    fn prop_integer_lists(values in prop::collection::vec(any::<i64>(), 0..20)) {
        let ok = round_trips(&ListHolder { values });
        prop_assert!(ok);
    }

    #[test]
    fn prop_optional_integers(value in proptest::option::of(any::<i64>())) {
        let ok = round_trips(&OptionalHolder { value });
        prop_assert!(ok);
    }

    #[test]
    fn prop_mixed_structs(flag in any::<bool>(), count in any::<u32>(), label in "[a-z ]{0,40}") {
        let ok = round_trips(&MixedHolder { flag, count, label });
        prop_assert!(ok);
    }
}
