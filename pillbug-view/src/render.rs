use lazy_static::lazy_static;
use pillbug_feed::AnnotatedPost;
use pillbug_msg::Status;
use pillbug_ref::StatusId;
use pillbug_threads::{NodeContent, PostTreeNode};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
pub struct FeedEntry<'a> {
    #[serde(flatten)]
    pub annotated: &'a AnnotatedPost<'a>,
    pub linked: Option<&'a Status>,
}

pub fn feed_entries<'a>(
    annotated: &'a [AnnotatedPost<'a>],
    linked: &'a HashMap<StatusId, Status>,
) -> Vec<FeedEntry<'a>> {
    annotated
        .iter()
        .map(|post| FeedEntry {
            annotated: post,
            linked: post.linked_id().and_then(|id| linked.get(id)),
        })
        .collect()
}

pub fn render_thread(tree: &PostTreeNode) -> String {
    let mut out = String::new();
    let mut stack = vec![(tree, 0)];

    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let marker = if node.highlighted { '>' } else { '-' };
        let line = match &node.content {
            NodeContent::Status(status) => summary(status),
            NodeContent::Placeholder { message } => format!("[{}]", message),
        };
        out.push_str(&format!("{}{} {}\n", indent, marker, line));

        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    out
}

pub fn render_feed(entries: &[FeedEntry<'_>], show_hidden: bool) -> String {
    let mut out = String::new();

    for entry in entries {
        let post = entry.annotated;
        if post.hide && !show_hidden {
            continue;
        }

        let mut badges = post.labels.clone();
        if post.hide {
            badges.insert(0, "hidden".to_string());
        }
        let badges = if badges.is_empty() {
            String::new()
        } else {
            format!(" [{}]", badges.join(", "))
        };

        out.push_str(&format!("-{} {}\n", badges, summary(post.post)));
        if let Some(linked) = entry.linked {
            out.push_str(&format!("    in reply to {}\n", summary(linked)));
        }
    }

    out
}

fn summary(status: &Status) -> String {
    let text = if status.spoiler_text.is_empty() {
        plain_text(&status.content)
    } else {
        format!("CW: {}", status.spoiler_text)
    };
    format!("@{} ({}): {}", status.account.acct, status.id, text)
}

fn plain_text(html: &str) -> String {
    lazy_static! {
        static ref TAG: Regex = Regex::new("<[^>]*>").unwrap();
    }
    TAG.replace_all(html, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbug_feed::{evaluate, FeedPreset};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn status(id: &str, in_reply_to_id: Option<&str>, content: &str) -> Status {
        serde_json::from_value(json!({
            "id": id,
            "account": { "id": "1", "username": "alice", "acct": "alice" },
            "content": content,
            "in_reply_to_id": in_reply_to_id,
            "application": { "name": "pillbug" },
        }))
        .unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text("<p>hello <b>there</b></p><p>again</p>"), "hello there again");
    }

    #[test]
    fn test_render_thread() {
        let mut root = PostTreeNode::status(status("1", None, "<p>root</p>"), false);
        let mut reply = PostTreeNode::status(status("2", Some("1"), "<p>reply</p>"), true);
        reply.children.push(PostTreeNode::placeholder("Missing post id 7"));
        root.children.push(reply);

        assert_eq!(
            render_thread(&root),
            "- @alice (1): root\n  > @alice (2): reply\n    - [Missing post id 7]\n"
        );
    }

    #[test]
    fn test_render_feed() {
        let statuses = vec![
            status("1", None, "<p>top</p>"),
            status("2", Some("1"), "<p>reply</p>"),
        ];
        let linked: HashMap<StatusId, Status> =
            [("1".parse().unwrap(), status("1", None, "<p>top</p>"))]
                .into_iter()
                .collect();
        let annotated = evaluate(&statuses, &FeedPreset::Pillbug.rules()).unwrap();
        let entries = feed_entries(&annotated, &linked);

        assert_eq!(render_feed(&entries, false), "- [pillbug] @alice (1): top\n");
        assert_eq!(
            render_feed(&entries, true),
            "- [pillbug] @alice (1): top\n\
             - [hidden, pillbug] @alice (2): reply\n    in reply to @alice (1): top\n"
        );
    }
}
