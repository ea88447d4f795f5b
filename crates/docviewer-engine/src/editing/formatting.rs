use super::error::EditorError;
use super::format::{TextFormat, TextFormatType};
use super::selection::{Point, TextRange};
use super::state::EditorState;

impl EditorState {
    /// Toggles an inline format over the selection.
    ///
    /// A caret only flips the pending format for the next typed text. A range splits
    /// its boundary text nodes and gives every selected run the state the first run
    /// toggles to, so mixed selections become uniformly formatted.
    pub fn format_text(&mut self, format: TextFormatType) -> Result<(), EditorError> {
        let Some(range) = self.range_selection().cloned() else {
            return Ok(());
        };
        if range.is_collapsed() {
            if let Some(range) = self.range_selection_mut() {
                range.format = range.format.toggled(format);
            }
            return Ok(());
        }
        let forward = self.ordered_points(&range).0 == range.anchor;

        let ranges: Vec<TextRange> = self
            .selected_text_ranges()
            .into_iter()
            .filter(|r| !r.is_empty())
            .collect();
        let Some(first) = ranges.first() else {
            return Ok(());
        };
        let target = self
            .text(first.key)
            .map_or(TextFormat::empty(), |text| text.format)
            .toggled(format);
        let on = target.has(format);

        let mut isolated = Vec::with_capacity(ranges.len());
        for r in ranges {
            let key = self.isolate_text(r)?;
            let text = self.text_mut(key)?;
            text.format = text.format.with(format, on);
            isolated.push(key);
        }

        if let (Some(&first), Some(&last)) = (isolated.first(), isolated.last()) {
            let start = Point::text(first, 0);
            let end = Point::text(last, self.text_len(last));
            if forward {
                self.select(start, end);
            } else {
                self.select(end, start);
            }
            if let Some(range) = self.range_selection_mut() {
                range.format = target;
            }
        }
        Ok(())
    }
}
