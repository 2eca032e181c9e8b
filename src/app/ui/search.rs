use eframe::egui::{self, Key, RichText, Ui};

use crate::graph::{DEFAULT_SUGGESTION_LIMIT, Suggestion};

use super::super::ViewModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SuggestionKey {
    Up,
    Down,
}

/// Moves the keyboard highlight through `count` suggestions, stopping at
/// either end.
fn move_highlight(current: Option<usize>, count: usize, key: SuggestionKey) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;
    Some(match (key, current) {
        (SuggestionKey::Down, None) => 0,
        (SuggestionKey::Down, Some(index)) => (index + 1).min(last),
        (SuggestionKey::Up, None) => 0,
        (SuggestionKey::Up, Some(index)) => index.saturating_sub(1).min(last),
    })
}

fn suggestion_text(suggestion: &Suggestion) -> &str {
    if suggestion.label.is_empty() {
        &suggestion.id
    } else {
        &suggestion.label
    }
}

impl ViewModel {
    fn select_suggestion(&mut self, suggestion: &Suggestion) {
        self.search = suggestion_text(suggestion).to_owned();
        self.suggestions_open = false;
        self.highlighted_suggestion = None;
        self.controller.set_search(&self.search);
    }

    pub(in crate::app) fn draw_search(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.separator();
        ui.add_space(4.0);

        let response = ui
            .add(egui::TextEdit::singleline(&mut self.search).hint_text("Search nodes..."))
            .on_hover_text("Filter the graph to matches and their neighbourhood.");

        if response.changed() {
            self.highlighted_suggestion = None;
            self.suggestions_open = !self.search.trim().is_empty();
            self.controller.set_search(&self.search);
        }
        if response.gained_focus() {
            self.suggestions_open = true;
        }

        let suggestions = if self.suggestions_open {
            self.controller.suggestions(DEFAULT_SUGGESTION_LIMIT)
        } else {
            Vec::new()
        };

        if response.has_focus() && !suggestions.is_empty() {
            let (down, up) = ui.input(|input| {
                (
                    input.key_pressed(Key::ArrowDown),
                    input.key_pressed(Key::ArrowUp),
                )
            });
            if down {
                self.highlighted_suggestion =
                    move_highlight(self.highlighted_suggestion, suggestions.len(), SuggestionKey::Down);
            }
            if up {
                self.highlighted_suggestion =
                    move_highlight(self.highlighted_suggestion, suggestions.len(), SuggestionKey::Up);
            }
        }

        if response.lost_focus() {
            let (enter, escape) =
                ui.input(|input| (input.key_pressed(Key::Enter), input.key_pressed(Key::Escape)));
            if escape {
                self.suggestions_open = false;
                self.highlighted_suggestion = None;
            } else if enter {
                let chosen = self
                    .highlighted_suggestion
                    .and_then(|index| suggestions.get(index));
                if let Some(suggestion) = chosen {
                    self.select_suggestion(suggestion);
                    return;
                }
            }
        }

        let mut clicked = None;
        for (index, suggestion) in suggestions.iter().enumerate() {
            let selected = self.highlighted_suggestion == Some(index);
            let item = ui.selectable_label(selected, suggestion_text(suggestion));
            if item.hovered() {
                self.highlighted_suggestion = Some(index);
            }
            if item.clicked() {
                clicked = Some(suggestion);
            }
        }
        if let Some(suggestion) = clicked {
            self.select_suggestion(suggestion);
        }

        let root_id = self.controller.root_id().to_owned();
        ui.add_space(8.0);
        ui.label(RichText::new(format!("root: {root_id}")).weak());
        let depth = self.controller.config().search_depth;
        if !self.controller.config().search_query.is_empty() {
            ui.label(RichText::new(format!("showing matches within {depth} links")).weak());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_stops_at_both_ends() {
        assert_eq!(move_highlight(None, 3, SuggestionKey::Down), Some(0));
        assert_eq!(move_highlight(Some(1), 3, SuggestionKey::Down), Some(2));
        assert_eq!(move_highlight(Some(2), 3, SuggestionKey::Down), Some(2));
        assert_eq!(move_highlight(Some(2), 3, SuggestionKey::Up), Some(1));
        assert_eq!(move_highlight(Some(0), 3, SuggestionKey::Up), Some(0));
        assert_eq!(move_highlight(None, 3, SuggestionKey::Up), Some(0));
        assert_eq!(move_highlight(Some(1), 0, SuggestionKey::Down), None);
    }

    #[test]
    fn suggestion_falls_back_to_id() {
        let bare = Suggestion {
            id: "pantry".to_owned(),
            label: String::new(),
        };
        assert_eq!(suggestion_text(&bare), "pantry");
        let labelled = Suggestion {
            id: "pantry".to_owned(),
            label: "Pantry".to_owned(),
        };
        assert_eq!(suggestion_text(&labelled), "Pantry");
    }
}
