//! Caret movement over the editor's text nodes.

use docviewer_engine::EditorState;
use docviewer_engine::editing::Point;

/// Moves the focus one character. Without `extend` a range collapses to the side
/// being moved towards instead.
pub fn move_horizontal(state: &mut EditorState, forward: bool, extend: bool) {
    let Some(range) = state.range_selection().cloned() else {
        return;
    };
    if !extend && !range.is_collapsed() {
        let (start, end) = state.ordered_points(&range);
        state.select_caret(if forward { end } else { start });
        return;
    }
    let Some(focus) = step(state, range.focus, forward) else {
        return;
    };
    if extend {
        state.select(range.anchor, focus);
    } else {
        state.select_caret(focus);
    }
}

/// Moves the caret to the start of the previous or next block.
pub fn move_vertical(state: &mut EditorState, forward: bool) {
    let blocks = state.leaf_blocks();
    let Some(current) = current_block(state) else {
        if let Some(&first) = blocks.first() {
            state.select_start(first);
        }
        return;
    };
    let Some(index) = blocks.iter().position(|&block| block == current) else {
        return;
    };
    let target = if forward {
        blocks.get(index + 1)
    } else {
        index.checked_sub(1).and_then(|i| blocks.get(i))
    };
    if let Some(&target) = target {
        state.select_start(target);
    }
}

pub fn move_to_block_edge(state: &mut EditorState, end: bool) {
    if let Some(block) = current_block(state) {
        if end {
            state.select_end(block);
        } else {
            state.select_start(block);
        }
    }
}

fn current_block(state: &EditorState) -> Option<docviewer_engine::NodeKey> {
    let focus = state.range_selection()?.focus;
    let point = state.resolve_point(focus);
    state.nearest_block(point.key)
}

fn step(state: &EditorState, point: Point, forward: bool) -> Option<Point> {
    if !point.is_text() {
        let block = state.nearest_block(point.key)?;
        let blocks = state.leaf_blocks();
        let index = blocks.iter().position(|&b| b == block)?;
        let next = if forward {
            blocks.get(index + 1)?
        } else {
            blocks.get(index.checked_sub(1)?)?
        };
        return Some(if forward {
            state.start_point(*next)
        } else {
            state.end_point(*next)
        });
    }

    let len = state.text_len(point.key);
    if forward && point.offset < len {
        return Some(Point::text(point.key, point.offset + 1));
    }
    if !forward && point.offset > 0 {
        return Some(Point::text(point.key, point.offset - 1));
    }

    let texts: Vec<_> = state
        .preorder()
        .into_iter()
        .filter(|&key| state.is_text(key))
        .collect();
    let index = texts.iter().position(|&key| key == point.key)?;
    let neighbour = if forward {
        *texts.get(index + 1)?
    } else {
        *texts.get(index.checked_sub(1)?)?
    };
    // Runs of the same block share the boundary position, so skip over it.
    let same_block = state.nearest_block(neighbour) == state.nearest_block(point.key);
    let neighbour_len = state.text_len(neighbour);
    let offset = match (forward, same_block) {
        (true, true) => neighbour_len.min(1),
        (true, false) => 0,
        (false, true) => neighbour_len.saturating_sub(1),
        (false, false) => neighbour_len,
    };
    Some(Point::text(neighbour, offset))
}
