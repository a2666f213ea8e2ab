//! The operation panel view: one implementation for every catalog-driven tab.
//!
//! Left: the operations passing the category filter. Right: the expanded
//! operation's input fields above its result pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use seodeck_engine::{PanelController, PanelSnapshot};
use seodeck_types::{FieldKind, OperationDescriptor, PanelId};

use crate::{
    app::{App, Effect, PanelFocus, THROBBER, next_category},
    theme,
    ui::components::Component,
};

const RESULT_SCROLL_STEP: u16 = 10;

#[derive(Debug, Default)]
pub struct PanelComponent;

/// Display metadata for one editable field of an operation.
struct FieldRow<'a> {
    name: &'a str,
    label: &'a str,
    kind: FieldKind,
    placeholder: &'a str,
    default: Option<&'a str>,
}

fn field_rows(operation: &OperationDescriptor) -> Vec<FieldRow<'_>> {
    operation
        .editable_field_names()
        .into_iter()
        .map(|name| match operation.field(name) {
            Some(field) => FieldRow {
                name,
                label: &field.label,
                kind: field.kind,
                placeholder: &field.placeholder,
                default: field.default.as_deref(),
            },
            None => FieldRow {
                name,
                label: "URL",
                kind: FieldKind::Text,
                placeholder: "https://example.com (used when no target URL is set)",
                default: None,
            },
        })
        .collect()
}

fn active_panel(app: &App) -> Option<(PanelId, PanelController)> {
    let panel = app.tab.panel()?;
    app.session.panel(panel).cloned().map(|controller| (panel, controller))
}

fn execute(controller: &PanelController, panel: PanelId, operation_id: &str) -> Vec<Effect> {
    if controller.selected().as_deref() != Some(operation_id) {
        controller.select_operation(operation_id);
    }
    vec![Effect::Execute {
        panel,
        operation: operation_id.to_string(),
    }]
}

impl PanelComponent {
    fn handle_operations_key(
        app: &mut App,
        panel: PanelId,
        controller: &PanelController,
        operations: &[OperationDescriptor],
        key: KeyEvent,
    ) -> Vec<Effect> {
        let view = app.panel_view(panel);
        let highlighted = operations.get(view.cursor);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => view.move_cursor(-1, operations.len()),
            KeyCode::Down | KeyCode::Char('j') => view.move_cursor(1, operations.len()),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(operation) = highlighted {
                    let expanded = controller.select_operation(&operation.id).is_some();
                    view.result_scroll = 0;
                    if expanded && !operation.editable_field_names().is_empty() {
                        view.focus = PanelFocus::Fields;
                        view.field_cursor = 0;
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(operation) = highlighted {
                    return execute(controller, panel, &operation.id);
                }
            }
            KeyCode::Char('c') => {
                let current = controller.snapshot().category_filter;
                controller.set_category_filter(next_category(&controller.catalog(), current.as_deref()));
                view.cursor = 0;
            }
            KeyCode::PageDown => view.result_scroll = view.result_scroll.saturating_add(RESULT_SCROLL_STEP),
            KeyCode::PageUp => view.result_scroll = view.result_scroll.saturating_sub(RESULT_SCROLL_STEP),
            _ => {}
        }
        Vec::new()
    }

    fn handle_fields_key(
        app: &mut App,
        panel: PanelId,
        controller: &PanelController,
        operation: &OperationDescriptor,
        key: KeyEvent,
    ) -> Vec<Effect> {
        let rows = field_rows(operation);
        match key.code {
            KeyCode::Esc => app.panel_view(panel).focus = PanelFocus::Operations,
            KeyCode::Up | KeyCode::Char('k') => app.panel_view(panel).move_field_cursor(-1, rows.len()),
            KeyCode::Down | KeyCode::Char('j') => app.panel_view(panel).move_field_cursor(1, rows.len()),
            KeyCode::Enter => {
                if app.cycle_enum_field(panel, &operation.id) {
                    return Vec::new();
                }
                let view = app.panel_view(panel);
                if let Some(row) = rows.get(view.field_cursor) {
                    let current = controller.field_value(&operation.id, row.name);
                    let cursor = current.len();
                    view.editor.set_input(current);
                    view.editor.set_cursor(cursor);
                    view.focus = PanelFocus::Editing;
                }
            }
            KeyCode::Char('e') => return execute(controller, panel, &operation.id),
            KeyCode::PageDown => {
                let view = app.panel_view(panel);
                view.result_scroll = view.result_scroll.saturating_add(RESULT_SCROLL_STEP);
            }
            KeyCode::PageUp => {
                let view = app.panel_view(panel);
                view.result_scroll = view.result_scroll.saturating_sub(RESULT_SCROLL_STEP);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_editing_key(
        app: &mut App,
        panel: PanelId,
        controller: &PanelController,
        operation: &OperationDescriptor,
        key: KeyEvent,
    ) -> Vec<Effect> {
        let rows = field_rows(operation);
        let view = app.panel_view(panel);
        let editor = &mut view.editor;
        match key.code {
            KeyCode::Enter => {
                if let Some(row) = rows.get(view.field_cursor) {
                    controller.update_field(&operation.id, row.name, view.editor.input());
                }
                view.focus = PanelFocus::Fields;
            }
            KeyCode::Esc => view.focus = PanelFocus::Fields,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => editor.clear(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(c),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            _ => {}
        }
        Vec::new()
    }

    fn render_operations(
        frame: &mut Frame,
        rect: Rect,
        app: &mut App,
        controller: &PanelController,
        operations: &[OperationDescriptor],
        snapshot: &PanelSnapshot,
    ) {
        let catalog = controller.catalog();
        let filter_label = snapshot
            .category_filter
            .as_deref()
            .and_then(|id| catalog.category_label(id))
            .unwrap_or("All");
        let throbber = THROBBER[app.throbber_idx];
        let view = app.panel_view(controller.panel());
        let focused = view.focus == PanelFocus::Operations;
        let cursor = view.cursor;

        let items: Vec<ListItem> = operations
            .iter()
            .map(|operation| {
                let expanded = snapshot.selected.as_deref() == Some(operation.id.as_str());
                let marker = match (expanded, snapshot.is_executing) {
                    (true, true) => throbber,
                    (true, false) => "▾",
                    (false, _) => "▸",
                };
                let style = if expanded { theme::key_style() } else { theme::text_style() };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{marker} "), theme::text_muted()),
                    Span::styled(operation.label.clone(), style),
                ]))
            })
            .collect();

        let title = format!(" {} ({}) · {} ", catalog.title, operations.len(), filter_label);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(title, theme::title_style()));
        let empty = operations.is_empty();
        let list = List::new(items).block(block).highlight_style(theme::selected_style());
        let mut state = ListState::default().with_selected((!empty).then_some(cursor));
        frame.render_stateful_widget(list, rect, &mut state);
    }

    fn render_details(
        frame: &mut Frame,
        rect: Rect,
        app: &mut App,
        controller: &PanelController,
        operation: Option<&OperationDescriptor>,
    ) {
        let view = app.panel_view(controller.panel());
        let focused = matches!(view.focus, PanelFocus::Fields | PanelFocus::Editing);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(" Operation ", theme::title_style()));
        let inner = block.inner(rect);

        let Some(operation) = operation else {
            let hint = Paragraph::new(Line::from(Span::styled(
                "Press Enter to expand an operation, e to run it",
                theme::text_muted(),
            )))
            .block(block);
            frame.render_widget(hint, rect);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(operation.label.clone(), theme::key_style())),
            Line::from(Span::styled(operation.description.clone(), theme::text_muted())),
            Line::from(vec![
                Span::styled(format!("{} ", operation.method), theme::title_style()),
                Span::styled(operation.endpoint.clone(), theme::text_style()),
            ]),
        ];
        let rows = field_rows(operation);
        if rows.is_empty() {
            lines.push(Line::from(Span::styled("No inputs", theme::text_muted())));
        }
        let first_field_line = lines.len();
        for (index, row) in rows.iter().enumerate() {
            let at_cursor = focused && index == view.field_cursor;
            let pointer = if at_cursor { "› " } else { "  " };
            let label_style = if at_cursor {
                theme::key_style()
            } else {
                theme::title_style()
            };
            let mut spans = vec![
                Span::styled(pointer, theme::key_style()),
                Span::styled(format!("{}: ", row.label), label_style),
            ];
            if at_cursor && view.focus == PanelFocus::Editing {
                spans.push(Span::styled(view.editor.input().to_string(), theme::text_style()));
            } else {
                let value = controller.field_value(&operation.id, row.name);
                spans.push(match (value.is_empty(), row.default) {
                    (false, _) => Span::styled(value, theme::text_style()),
                    (true, Some(default)) => Span::styled(default.to_string(), theme::text_muted()),
                    (true, None) => Span::styled(
                        row.placeholder.to_string(),
                        theme::text_muted().add_modifier(Modifier::ITALIC),
                    ),
                });
            }
            if row.kind == FieldKind::Enum {
                spans.push(Span::styled("  (Enter cycles)", theme::text_muted()));
            } else if row.kind.is_multiline() {
                spans.push(Span::styled(format!("  [{}]", kind_hint(row.kind)), theme::text_muted()));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines).block(block), rect);

        if view.focus == PanelFocus::Editing {
            let Some(row) = rows.get(view.field_cursor) else {
                return;
            };
            let offset = 2 + row.label.chars().count() + 2 + view.editor.cursor_column();
            let x = inner.x.saturating_add(offset as u16).min(inner.right().saturating_sub(1));
            let y = inner.y.saturating_add((first_field_line + view.field_cursor) as u16);
            if y < inner.bottom() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }

    fn render_result(frame: &mut Frame, rect: Rect, app: &mut App, panel: PanelId, snapshot: &PanelSnapshot) {
        let throbber = THROBBER[app.throbber_idx];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(false))
            .title(Span::styled(" Result (PgUp/PgDn) ", theme::title_style()));

        let mut lines: Vec<Line> = Vec::new();
        if snapshot.is_executing {
            lines.push(Line::from(Span::styled(
                format!("{throbber} Running..."),
                theme::key_style(),
            )));
        }
        if let Some(error) = snapshot.last_error.as_deref() {
            lines.push(Line::from(Span::styled(error.to_string(), theme::text_style().fg(theme::ERROR))));
        }
        let result = snapshot
            .last_result
            .as_ref()
            .filter(|last| snapshot.selected.as_deref() == Some(last.operation_id.as_str()));
        if let Some(last) = result {
            let status = last.result.status.as_deref().unwrap_or("OK");
            lines.push(Line::from(vec![
                Span::styled("Status: ", theme::title_style()),
                Span::styled(status.to_string(), theme::text_style().fg(theme::status_color(status))),
            ]));
            if let Some(url) = last.result.source_url() {
                lines.push(Line::from(vec![
                    Span::styled("URL: ", theme::title_style()),
                    Span::styled(url.to_string(), theme::text_style()),
                ]));
            }
            lines.extend(
                last.result
                    .pretty()
                    .lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), theme::text_style()))),
            );
        } else if lines.is_empty() {
            lines.push(Line::from(Span::styled("No result yet", theme::text_muted())));
        }

        let view = app.panel_view(panel);
        let max_scroll = (lines.len() as u16).saturating_sub(1);
        view.result_scroll = view.result_scroll.min(max_scroll);
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((view.result_scroll, 0));
        frame.render_widget(paragraph, rect);
    }
}

fn kind_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Json => "JSON",
        FieldKind::List => "comma separated",
        _ => "text",
    }
}

impl Component for PanelComponent {
    fn is_capturing_text(&self, app: &App) -> bool {
        app.tab
            .panel()
            .and_then(|panel| app.panels.get(&panel))
            .is_some_and(|view| view.focus == PanelFocus::Editing)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some((panel, controller)) = active_panel(app) else {
            return Vec::new();
        };
        let operations = controller.visible_operations();
        let view = app.panel_view(panel);
        view.clamp(operations.len());
        let focus = view.focus;

        let selected = controller.selected().and_then(|id| controller.catalog().find(&id).cloned());
        match (focus, selected) {
            (PanelFocus::Operations, _) | (_, None) => {
                app.panel_view(panel).focus = PanelFocus::Operations;
                Self::handle_operations_key(app, panel, &controller, &operations, key)
            }
            (PanelFocus::Fields, Some(operation)) => Self::handle_fields_key(app, panel, &controller, &operation, key),
            (PanelFocus::Editing, Some(operation)) => {
                Self::handle_editing_key(app, panel, &controller, &operation, key)
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some((panel, controller)) = active_panel(app) else {
            return;
        };
        let operations = controller.visible_operations();
        app.panel_view(panel).clamp(operations.len());
        let snapshot = controller.snapshot();
        let selected = snapshot
            .selected
            .as_deref()
            .and_then(|id| controller.catalog().find(id).cloned());

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(rect);
        let detail_height = selected
            .as_ref()
            .map_or(3, |operation| field_rows(operation).len().max(1) as u16 + 5);
        let [fields_area, result_area] =
            Layout::vertical([Constraint::Length(detail_height), Constraint::Min(3)]).areas(detail_area);

        Self::render_operations(frame, list_area, app, &controller, &operations, &snapshot);
        Self::render_details(frame, fields_area, app, &controller, selected.as_ref());
        Self::render_result(frame, result_area, app, panel, &snapshot);
    }
}
