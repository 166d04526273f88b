//! Integration tests for the script parser.

use oeos_parser::oeos::ast::{Body, ChoiceOption, Command, Else, Value};
use oeos_parser::{parse, Document, ParseErrorKind};
use rstest::rstest;

fn commands_of(source: &str, page: &str) -> Vec<Command> {
    let doc = parse(source).expect("script should parse");
    doc.page(page).expect("page should exist").commands.clone()
}

fn error_of(source: &str) -> (usize, ParseErrorKind) {
    let err = parse(source).expect_err("script should fail");
    (err.line, err.kind)
}

#[test]
fn test_empty_source_has_no_pages() {
    let doc = parse("").unwrap();
    assert!(doc.pages.is_empty());
    assert_eq!(doc.init, None);
}

#[test]
fn test_comments_and_hash_page_alias() {
    let source = "\
# intro
  # a comment, not a page
  say \"hi\"
    # comments may sit at any depth
> next
  end
";
    let doc = parse(source).unwrap();
    let ids: Vec<_> = doc.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["intro", "next"]);
    assert_eq!(
        doc.pages[0].commands,
        vec![Command::new("say").with_param("label", "hi")]
    );
}

#[test]
fn test_duplicate_page_replaces_earlier_one_in_place() {
    let doc = parse("> a\n  say \"1\"\n> b\n  end\n> a\n  say \"2\"\n").unwrap();
    let ids: Vec<_> = doc.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(
        doc.pages[0].commands,
        vec![Command::new("say").with_param("label", "2")]
    );
}

#[test]
fn test_crlf_line_endings() {
    let commands = commands_of("> p\r\n  goto \"q\"\r\n  end\r\n", "p");
    assert_eq!(commands, vec![Command::goto("q"), Command::end()]);
}

#[test]
fn test_unknown_commands_pass_through() {
    let commands = commands_of(
        "> p\n  custom.thing alpha: 1 beta: \"two\" gamma: $three flag: false\n",
        "p",
    );
    assert_eq!(
        commands,
        vec![Command::new("custom.thing")
            .with_param("alpha", 1i64)
            .with_param("beta", "two")
            .with_param("gamma", "$three")
            .with_param("flag", false)]
    );
}

#[test]
fn test_nested_blocks_close_on_dedent() {
    let source = "\
> p
  timer duration: \"3s\"
    if $a
      choice
        \"x\" -> end
        \"y\"
          say \"why\"
    say \"after if\"
  say \"after timer\"
";
    let commands = commands_of(source, "p");
    assert_eq!(commands.len(), 2);
    let Body::Timer(Some(timer_body)) = &commands[0].body else {
        panic!("timer body missing");
    };
    assert_eq!(timer_body.len(), 2);
    let cond = timer_body[0].as_conditional().unwrap();
    let Body::Options(options) = &cond.commands[0].body else {
        panic!("choice options missing");
    };
    assert_eq!(
        options,
        &vec![
            ChoiceOption::new("x").with_commands(vec![Command::end()]),
            ChoiceOption::new("y")
                .with_commands(vec![Command::new("say").with_param("label", "why")]),
        ]
    );
    assert_eq!(
        timer_body[1],
        Command::new("say").with_param("label", "after if")
    );
}

#[test]
fn test_else_if_chain_is_linked_not_flat() {
    let source = "\
> p
  if $n == 1
    say \"one\"
  else if $n == 2
    say \"two\"
  else if $n == 3
    say \"three\"
  else
    say \"many\"
  end
";
    let commands = commands_of(source, "p");
    assert_eq!(commands.len(), 2);
    let cond = commands[0].as_conditional().unwrap();
    let conditions: Vec<_> = cond.links().map(|l| l.condition.as_deref()).collect();
    assert_eq!(conditions, vec![Some("$n == 1"), Some("$n == 2"), Some("$n == 3")]);
    assert_eq!(
        cond.terminal(),
        Some(&vec![Command::new("say").with_param("label", "many")])
    );
}

#[test]
fn test_else_block_with_empty_body() {
    let commands = commands_of("> p\n  if $a\n    end\n  else\n", "p");
    let cond = commands[0].as_conditional().unwrap();
    assert_eq!(cond.otherwise, Some(Else::Commands(vec![])));
}

#[test]
fn test_empty_timer_body_is_dropped() {
    let commands = commands_of("> p\n  timer duration: \"1s\"\n  end\n", "p");
    assert_eq!(commands[0].body, Body::Timer(None));
}

#[test]
fn test_notification_lists_are_independent() {
    let source = "\
> p
  notification.create id: \"n\"
    timerCommands
      end
";
    let commands = commands_of(source, "p");
    let Body::Notification(lists) = &commands[0].body else {
        panic!("notification body missing");
    };
    assert_eq!(lists.commands, None);
    assert_eq!(lists.timer_commands, Some(vec![Command::end()]));
    assert_eq!(commands[0].params.get("id"), Some(&Value::from("n")));
}

#[test]
fn test_single_line_eval_is_trimmed() {
    let commands = commands_of("> p\n  eval code: \"  x = 1  \"\n", "p");
    assert_eq!(commands[0].params.get("action"), Some(&Value::from("x = 1")));
}

#[test]
fn test_tab_indentation_nests() {
    let commands = commands_of("> p\n\tif $a\n\t\tsay \"x\"\n\telse\n\t\tend\n", "p");
    assert_eq!(commands.len(), 1);
    let cond = commands[0].as_conditional().unwrap();
    assert_eq!(
        cond.commands,
        vec![Command::new("say").with_param("label", "x")]
    );
    assert_eq!(cond.terminal(), Some(&vec![Command::end()]));
}

#[test]
fn test_inline_variable_code_is_trimmed() {
    let commands = commands_of("> p\n  eval code: \"$x = 1 \"\n", "p");
    assert_eq!(commands[0].params.get("action"), Some(&Value::from("$x = 1")));
}

#[test]
fn test_eval_block_starting_with_variable_matches_tree() {
    let doc = parse("> p\n  eval\n    $x = 1\n    $y = 2\n").unwrap();
    let tree = serde_json::json!({"pages": {"p": [{"eval": {"action": "$x = 1\n$y = 2"}}]}});
    assert_eq!(doc, Document::from_tree(&tree).unwrap());
}

#[test]
fn test_eval_block_keeps_hash_and_blank_lines() {
    let source = "\
> p
  eval
    # not a comment
    a = 1;

    b = 2;
  # a comment
  end
";
    let commands = commands_of(source, "p");
    assert_eq!(
        commands,
        vec![
            Command::new("eval").with_param("action", "# not a comment\na = 1;\n\nb = 2;"),
            Command::end(),
        ]
    );
}

#[rstest]
#[case::command_before_page("say \"hi\"\n", 1, ParseErrorKind::CommandOutsidePage)]
#[case::else_without_if("> p\n  say \"x\"\n  else\n", 3, ParseErrorKind::ElseWithoutIf)]
#[case::else_in_other_block(
    "> p\n  if $a\n    end\n  timer\n    else\n",
    5,
    ParseErrorKind::ElseWithoutIf
)]
#[case::else_after_else(
    "> p\n  if $a\n    end\n  else\n    end\n  else if $b\n",
    6,
    ParseErrorKind::ElseAfterTerminalElse
)]
#[case::else_after_empty_else(
    "> p\n  if $a\n  else\n  else\n",
    4,
    ParseErrorKind::ElseAfterTerminalElse
)]
#[case::option_outside_choice("> p\n  \"Yes\" -> end\n", 2, ParseErrorKind::OptionOutsideChoice)]
#[case::notification_child(
    "> p\n  notification.create\n    say \"x\"\n",
    3,
    ParseErrorKind::UnexpectedNotificationChild
)]
#[case::bad_shortcut(
    "> p\n  choice\n    \"Go\" -> jump \"x\"\n",
    3,
    ParseErrorKind::UnsupportedShortcut("jump".to_string())
)]
#[case::unterminated_meta("\n---\ninit: |\n  x = 1\n> p\n", 2, ParseErrorKind::UnterminatedMeta)]
fn test_errors(
    #[case] source: &str,
    #[case] line: usize,
    #[case] kind: ParseErrorKind,
) {
    assert_eq!(error_of(source), (line, kind));
}

#[test]
fn test_malformed_option() {
    let (line, kind) = error_of("> p\n  choice\n    Go -> end\n");
    assert_eq!(line, 3);
    assert!(matches!(kind, ParseErrorKind::MalformedOption(_)));
}
