//! Graphviz rendering of a dialog's transition graph.

use std::fmt::Write;

use crate::dialog::Dialog;

/// Synthetic source node for global transitions.
const ANY_STEP: &str = "*";

impl Dialog {
    /// Renders the transition tables as a Graphviz `digraph`.
    ///
    /// Nodes are sorted by name and edges by (source, event) so the output is stable. The begin step
    /// is filled green, the end step red; global transitions start at a dashed `*` node.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dialog {\n    rankdir=LR;\n    node [shape=box, style=rounded];\n");

        let mut names: Vec<&String> = self.steps().keys().collect();
        names.sort();
        for name in names {
            let style = if name == self.begin_step().name() {
                ", style=\"rounded,filled\", fillcolor=\"#77ff77\""
            } else if name == self.end_step().name() {
                ", style=\"rounded,filled\", fillcolor=\"#ff7777\""
            } else {
                ""
            };
            let _ = writeln!(out, "    {} [label={}{}];", quote(name), quote(name), style);
        }

        let mut edges: Vec<(&str, &str, &str)> = self
            .transitions()
            .iter()
            .flat_map(|(src, by_event)| {
                by_event
                    .iter()
                    .map(move |(event, dst)| (src.as_str(), event.as_str(), dst.as_str()))
            })
            .collect();
        edges.sort();
        for (src, event, dst) in edges {
            let _ = writeln!(out, "    {} -> {} [label={}];", quote(src), quote(dst), quote(event));
        }

        let mut globals: Vec<(&str, &str)> = self
            .global_transitions()
            .iter()
            .map(|(event, dst)| (event.as_str(), dst.as_str()))
            .collect();
        globals.sort();
        if !globals.is_empty() {
            let _ = writeln!(out, "    {} [shape=circle, style=dashed];", quote(ANY_STEP));
        }
        for (event, dst) in globals {
            let _ = writeln!(
                out,
                "    {} -> {} [label={}, style=dashed];",
                quote(ANY_STEP),
                quote(dst),
                quote(event)
            );
        }

        out.push_str("}\n");
        out
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
