//! Dialect-level tests: how document text maps to values and back,
//! independent of any schema.

use indoc::indoc;
use yamlish::{json, parse_value, write_value, Error, Value};

fn parsed(input: &str) -> Value {
    parse_value(input).unwrap()
}

#[test]
fn scalar_shapes_are_guessed_from_text() {
    let value = parsed(indoc! {"
        int: 42
        negative: -17
        float: 3.5
        text: hello world
        infinity-is-text: inf
    "});
    assert_eq!(value["int"], Value::from(42));
    assert_eq!(value["negative"], Value::from(-17));
    assert_eq!(value["float"], Value::from(3.5));
    assert_eq!(value["text"], Value::from("hello world"));
    assert_eq!(value["infinity-is-text"], Value::from("inf"));
}

#[test]
fn quoting_styles_read_the_same_text() {
    let value = parsed(indoc! {"
        plain: steve
        single: 'steve'
        double: \"steve\"
    "});
    assert_eq!(value["plain"], value["single"]);
    assert_eq!(value["single"], value["double"]);
}

#[test]
fn quotes_protect_ambiguous_text() {
    let value = parsed(indoc! {"
        number-like: '42'
        null-like: 'null'
        spaced: '  padded  '
    "});
    assert_eq!(value["number-like"], Value::from("42"));
    assert_eq!(value["null-like"], Value::from("null"));
    assert_eq!(value["spaced"], Value::from("  padded  "));
}

#[test]
fn single_quotes_double_to_escape() {
    let value = parsed("said: 'it''s fine'\n");
    assert_eq!(value["said"], Value::from("it's fine"));
}

#[test]
fn double_quoted_escapes() {
    let value = parsed(r#"text: "tab\there\nbell\a hex\x41 wideB""#);
    assert_eq!(value["text"], Value::from("tab\there\nbell\u{7} hexA wideB"));
}

#[test]
fn unicode_escapes_cover_both_widths() {
    let value = parsed(r#"text: "wide\u0041 star\U0001F31F""#);
    assert_eq!(value["text"], Value::from("wideA star\u{1F31F}"));
}

#[test]
fn colons_inside_keys_need_no_quotes() {
    let value = parsed(indoc! {"
        c::c: 1
        ns:key: two
    "});
    // Only a colon followed by whitespace separates key from value.
    assert_eq!(value["c::c"], Value::from(1));
    assert_eq!(value["ns:key"], Value::from("two"));
}

#[test]
fn invalid_escapes_are_fatal() {
    assert!(matches!(
        parse_value(r#"text: "\q""#),
        Err(Error::InvalidEscape('q'))
    ));
    assert!(matches!(
        parse_value(r#"text: "\xZZ""#),
        Err(Error::InvalidHexEscape(_))
    ));
}

#[test]
fn unterminated_quotes_are_fatal() {
    assert!(matches!(
        parse_value("text: \"no end"),
        Err(Error::UnexpectedEof(_))
    ));
}

#[test]
fn null_needs_a_boundary() {
    let value = parsed(indoc! {"
        nothing: null
        word: nullable
    "});
    assert_eq!(value["nothing"], Value::Null);
    assert_eq!(value["word"], Value::from("nullable"));
}

#[test]
fn nested_block_structures() {
    let value = parsed(indoc! {"
        server:
          port: 25565
          motd: welcome
        worlds:
          - overworld
          - nether
        after: done
    "});
    assert_eq!(value["server"]["port"], Value::from(25565));
    assert_eq!(value["server"]["motd"], Value::from("welcome"));
    assert_eq!(value["worlds"][0], Value::from("overworld"));
    assert_eq!(value["worlds"][1], Value::from("nether"));
    assert_eq!(value["after"], Value::from("done"));
}

#[test]
fn dedent_closes_a_sequence() {
    let value = parsed("list:\n  - a\n - b\n");
    // The second entry sits at a different indent and does not belong
    // to the list.
    assert_eq!(
        value["list"],
        Value::Sequence(vec![Value::from("a")])
    );
}

#[test]
fn flow_collections_nest() {
    let value = parsed("m: {a: [1, {b: 2}], c: null}\n");
    assert_eq!(value["m"]["a"][0], Value::from(1));
    assert_eq!(value["m"]["a"][1]["b"], Value::from(2));
    assert_eq!(value["m"]["c"], Value::Null);
}

#[test]
fn literal_blocks_keep_line_breaks() {
    let value = parsed(indoc! {"
        motd: |
          line one
          line two
        after: 1
    "});
    assert_eq!(value["motd"], Value::from("line one\nline two\n"));
    assert_eq!(value["after"], Value::from(1));
}

#[test]
fn folded_blocks_join_lines() {
    let value = parsed(indoc! {"
        motd: >
          joined with
          a space

          new paragraph
    "});
    assert_eq!(
        value["motd"],
        Value::from("joined with a space\nnew paragraph\n")
    );
}

#[test]
fn chomping_indicators() {
    let stripped = parsed("motd: |-\n  text\n\n\n");
    assert_eq!(stripped["motd"], Value::from("text"));

    let kept = parsed("motd: |+\n  text\n\n\nafter: 1\n");
    assert_eq!(kept["motd"], Value::from("text\n\n\n"));
    assert_eq!(kept["after"], Value::from(1));
}

#[test]
fn block_scalars_must_be_indented() {
    assert!(matches!(
        parse_value("motd: |\nnope\n"),
        Err(Error::BlockScalarNotIndented)
    ));
}

#[test]
fn comments_are_invisible_to_values() {
    let value = parsed(indoc! {"
        # leading comment
        a: 1 # trailing comment
        # between entries
        b: two # another
    "});
    assert_eq!(value["a"], Value::from(1));
    assert_eq!(value["b"], Value::from("two"));
}

#[test]
fn crlf_documents_parse() {
    let value = parsed("a: 1\r\nlist:\r\n  - x\r\n");
    assert_eq!(value["a"], Value::from(1));
    assert_eq!(value["list"][0], Value::from("x"));
}

#[test]
fn mixed_line_endings_are_fatal() {
    assert!(matches!(
        parse_value("a: 1\nb: 2\r\n"),
        Err(Error::MixedLineEndings { .. })
    ));
}

#[test]
fn written_values_read_back_equal() {
    let original = parsed(indoc! {"
        name: 'steve builds: things'
        count: 3
        ratio: 0.5
        empty-list: []
        notes:
          - 'line one'
          - plain
    "});
    let text = write_value(&original).unwrap();
    assert_eq!(parsed(&text), original);
}

#[test]
fn json_dialect_round_trips() {
    let original = parsed("a: 1\nlist:\n  - x\n  - 2\n");
    let text = json::write_value(&original).unwrap();
    assert_eq!(json::parse_value(&text).unwrap(), original);
}
