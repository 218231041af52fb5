//! Property tests over generated flowcharts

use mermaid_tidy::prelude::*;
use proptest::prelude::*;

const IDS: &[&str] = &["A", "B", "Start", "Guide", "node_3", "W1", "W2", "W10"];
const ARROWS: &[&str] = &["-->", "<-->", "-.->", "---", "<-.->"];

fn id() -> impl Strategy<Value = String> {
    prop::sample::select(IDS).prop_map(str::to_string)
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z]([A-Za-z ]{0,8}[A-Za-z])?"
}

fn node_line() -> impl Strategy<Value = String> {
    (id(), label(), 0..6usize).prop_map(|(id, label, shape)| match shape {
        0 => id,
        1 => format!("{}[{}]", id, label),
        2 => format!("{}[\"{}\"]", id, label),
        3 => format!("{}([{}])", id, label),
        4 => format!("{}[/{}/]", id, label),
        _ => format!("{}[\\{}\\]", id, label),
    })
}

fn connection_line() -> impl Strategy<Value = String> {
    (
        id(),
        id(),
        prop::sample::select(ARROWS),
        prop::option::of(label()),
        any::<bool>(),
    )
        .prop_map(|(source, target, arrow, label, inline)| match label {
            Some(label) if inline => format!("{} -. {} .- {}", source, label, target),
            Some(label) => format!("{} {}|{}| {}", source, arrow, label, target),
            None => format!("{} {} {}", source, arrow, target),
        })
}

fn other_line() -> impl Strategy<Value = String> {
    prop_oneof![
        label().prop_map(|text| format!("%% {}", text)),
        (1..4usize).prop_map(|n| format!("subgraph Sg{}", n)),
        label().prop_map(|text| format!("subgraph Sg9[{}]", text)),
        Just("end".to_string()),
        Just("classDef hot fill:#f00".to_string()),
        id().prop_map(|id| format!("class {} hot", id)),
        Just("linkStyle 0 stroke:#000".to_string()),
        Just("click A callback".to_string()),
    ]
}

fn diagram() -> impl Strategy<Value = String> {
    let header = prop_oneof![
        Just(String::new()),
        Just("flowchart TB\n".to_string()),
        Just("graph LR\n".to_string()),
        Just("%%{init: {'theme': 'forest'}}%%\nflowchart RL\n".to_string()),
    ];
    let line = prop_oneof![
        3 => node_line(),
        4 => connection_line(),
        2 => other_line(),
    ];
    (header, prop::collection::vec(line, 0..16))
        .prop_map(|(header, lines)| format!("{}{}", header, lines.join("\n")))
}

fn link_style_ordinals(text: &str) -> Vec<usize> {
    let mut ordinals: Vec<usize> = text
        .lines()
        .filter_map(|line| line.trim().strip_prefix("linkStyle "))
        .filter_map(|rest| rest.split_whitespace().next())
        .flat_map(|list| list.split(','))
        .filter_map(|ordinal| ordinal.parse().ok())
        .collect();
    ordinals.sort_unstable();
    ordinals
}

proptest! {
    #[test]
    fn tidy_is_idempotent(input in diagram()) {
        for config in [StyleConfig::default(), StyleConfig::passthrough()] {
            let once = tidy(&input, &config).unwrap();
            let twice = tidy(&once.formatted, &config).unwrap();
            prop_assert_eq!(&once.formatted, &twice.formatted);
            prop_assert!(!twice.changed);
        }
    }

    #[test]
    fn tidy_preserves_connections(input in diagram()) {
        let outcome = tidy(&input, &StyleConfig::default()).unwrap();
        let before: Vec<Connection> = FlowchartParser::new().parse(&input).connections().cloned().collect();
        let after: Vec<Connection> = FlowchartParser::new()
            .parse(&outcome.formatted)
            .connections()
            .cloned()
            .collect();
        prop_assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            prop_assert_eq!(&old.source, &new.source);
            prop_assert_eq!(&old.target, &new.target);
            prop_assert_eq!(old.arrow.is_dotted(), new.arrow.is_dotted());
        }
    }

    #[test]
    fn every_connection_gets_exactly_one_style(input in diagram()) {
        let outcome = tidy(&input, &StyleConfig::default()).unwrap();
        let count = FlowchartParser::new().parse(&input).connections().count();
        prop_assert_eq!(
            link_style_ordinals(&outcome.formatted),
            (0..count).collect::<Vec<_>>()
        );
    }

    #[test]
    fn every_line_is_indented(input in diagram()) {
        let outcome = tidy(&input, &StyleConfig::default()).unwrap();
        for line in outcome.formatted.lines().skip(1) {
            prop_assert!(line.starts_with("  "), "unindented line: {:?}", line);
        }
    }
}
