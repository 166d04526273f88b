//! Property-based round trips
//!
//! Any document whose values all have a script literal must survive serialize -> parse
//! unchanged, and encode -> decode through the tree format unchanged.

use oeos_parser::oeos::ast::{
    Body, ChoiceOption, Command, Conditional, Else, NotificationLists, Page, Params, Value,
};
use oeos_parser::{parse, serialize, Document, FormattingRules, ScriptSerializer};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        // Printable text, quotes and backslashes included
        "[ -~]{0,12}".prop_map(Value::from),
        "\\$[a-z_][a-z0-9_.]{0,6}".prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9f64..1.0e9f64).prop_map(Value::Float),
        "[a-zé ]{1,6}[日本]".prop_map(Value::from),
    ]
}

fn params_strategy() -> impl Strategy<Value = Params> {
    prop::collection::vec(("[a-z]{1,6}", value_strategy()), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,16}".prop_map(|s| s.trim().to_string()),
        prop::collection::vec((0usize..3, "[a-z0-9(){};=+#>$]{1,8}( [a-z0-9;=$]{1,4})?"), 2..5)
            .prop_map(|lines| {
                lines
                    .iter()
                    .enumerate()
                    .map(|(idx, (depth, text))| {
                        let depth = if idx == 0 { 0 } else { *depth };
                        format!("{}{}", "  ".repeat(depth), text)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
    ]
}

fn condition_strategy() -> impl Strategy<Value = String> {
    "\\$[a-z]{1,4} (==|<|>=) [0-9]{1,3}"
}

fn leaf_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::end()),
        value_strategy().prop_map(Command::goto),
        (value_strategy(), params_strategy()).prop_map(|(label, params)| {
            Command::new("say").with_params(params).with_param("label", label)
        }),
        ("(audio|image|storage)\\.[a-z]{2,6}", params_strategy())
            .prop_map(|(name, params)| Command::new(name).with_params(params)),
        code_strategy().prop_map(|code| Command::new("eval").with_param("action", code)),
    ]
}

fn option_strategy(
    body: impl Strategy<Value = Vec<Command>>,
) -> impl Strategy<Value = ChoiceOption> {
    (
        "[ -~]{0,10}",
        body,
        prop::option::of(value_strategy().prop_filter("true is the default", |v| !v.is_true())),
        prop::option::of(value_strategy()),
        any::<bool>(),
    )
        .prop_map(|(label, commands, visible, color, keep)| {
            let mut option = ChoiceOption::new(label).with_commands(commands);
            option.visible = visible;
            option.color = color;
            option.keep = keep;
            option
        })
}

fn chain_strategy(
    body: impl Strategy<Value = Vec<Command>> + Clone,
) -> impl Strategy<Value = Conditional> {
    (
        prop::collection::vec((condition_strategy(), body.clone()), 1..4),
        prop::option::of(body),
    )
        .prop_map(|(links, terminal)| {
            let mut links = links.into_iter();
            let mut head = match links.next() {
                Some((condition, commands)) => Conditional::new(condition).with_commands(commands),
                None => Conditional::default(),
            };
            for (condition, commands) in links {
                let link = Conditional::new(condition).with_commands(commands);
                head.append_else(Else::If(Box::new(link))).unwrap();
            }
            if let Some(commands) = terminal {
                head.append_else(Else::Commands(commands)).unwrap();
            }
            head
        })
}

fn command_strategy() -> impl Strategy<Value = Command> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        let body = prop::collection::vec(inner, 0..3);
        prop_oneof![
            chain_strategy(body.clone()).prop_map(Command::conditional),
            prop::collection::vec(option_strategy(body.clone()), 0..3)
                .prop_map(|options| Command::new("choice").with_body(Body::Options(options))),
            (
                params_strategy(),
                prop::option::of(body.clone()),
                prop::option::of(body.clone())
            )
                .prop_map(|(params, commands, timer_commands)| {
                    Command::new("notification.create")
                        .with_params(params)
                        .with_body(Body::Notification(NotificationLists {
                            commands,
                            timer_commands,
                        }))
                }),
            (
                params_strategy(),
                prop::option::of(body.prop_filter("empty bodies are dropped", |b| !b.is_empty()))
            )
                .prop_map(|(params, commands)| {
                    Command::new("timer")
                        .with_params(params)
                        .with_body(Body::Timer(commands))
                }),
        ]
    })
}

fn document_strategy() -> impl Strategy<Value = Document> {
    (
        prop::option::of(code_strategy().prop_filter("empty init is absent", |c| !c.is_empty())),
        prop::collection::vec(
            (
                "[a-z][a-z0-9_]{0,6}",
                prop::collection::vec(command_strategy(), 0..4),
            ),
            0..4,
        ),
    )
        .prop_map(|(init, pages)| {
            let mut doc = Document::new();
            doc.init = init;
            for (id, commands) in pages {
                doc.insert_page(Page::new(id, commands));
            }
            doc
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_script_round_trip(doc in document_strategy()) {
        let script = serialize(&doc);
        let parsed = parse(&script).map_err(|e| TestCaseError::fail(format!("{}\n{}", e, script)))?;
        prop_assert_eq!(parsed, doc, "script:\n{}", script);
    }

    #[test]
    fn test_tree_round_trip(doc in document_strategy()) {
        let decoded = Document::from_tree(&doc.to_tree())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded.to_tree(), doc.to_tree());
    }

    #[test]
    fn test_script_round_trip_with_tab_indent(doc in document_strategy()) {
        let rules = FormattingRules {
            indent_string: "\t".to_string(),
            blank_line_between_pages: false,
        };
        let script = ScriptSerializer::new(rules).serialize(&doc);
        let parsed = parse(&script).map_err(|e| TestCaseError::fail(format!("{}\n{}", e, script)))?;
        prop_assert_eq!(parsed, doc, "script:\n{}", script);
    }

    #[test]
    fn test_serialize_is_stable(doc in document_strategy()) {
        let once = serialize(&doc);
        let twice = serialize(&parse(&once).map_err(|e| TestCaseError::fail(e.to_string()))?);
        prop_assert_eq!(once, twice);
    }
}
