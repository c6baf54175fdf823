use anyhow::Result;

use crate::command::domain::{require_non_blank, AddCommentPayload, CommentView};
use crate::command::state::AppState;

pub(crate) fn add(state: &mut AppState, payload: AddCommentPayload) -> Result<CommentView> {
    require_non_blank("user", &payload.user)?;
    require_non_blank("content", &payload.content)?;

    let comment = state.add_comment(
        &payload.route,
        payload.user.trim(),
        &payload.content,
        payload.tag,
    )?;
    log::debug!("{} commented on {}", comment.username, payload.route);
    Ok(CommentView {
        hidden_by_default: comment.is_beta(),
        comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::test_support::state;
    use crag_catalog::CommentTag;

    fn payload(content: &str, tag: CommentTag) -> AddCommentPayload {
        AddCommentPayload {
            route: "the-nose".into(),
            user: " ana ".into(),
            content: content.into(),
            tag,
        }
    }

    #[test]
    fn beta_comments_start_hidden() {
        let mut state = state();
        let view = add(&mut state, payload("Undercling at the third bolt", CommentTag::Beta)).unwrap();
        assert!(view.hidden_by_default);
        assert_eq!(view.comment.username, "ana");
        assert_eq!(view.comment.tags, vec![CommentTag::Beta]);

        let view = add(&mut state, payload("Bolts replaced in 2024", CommentTag::Update)).unwrap();
        assert!(!view.hidden_by_default);
        assert_eq!(state.posted_comments("the-nose").len(), 2);
    }

    #[test]
    fn blank_content_is_rejected() {
        let mut state = state();
        let err = add(&mut state, payload(" \n ", CommentTag::Question)).unwrap_err();
        assert_eq!(err.to_string(), "content must be non-empty");
        assert!(state.posted_comments("the-nose").is_empty());
    }
}
