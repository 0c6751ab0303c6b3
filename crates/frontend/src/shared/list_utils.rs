//! Утилиты для фильтрации строк таблиц
use leptos::prelude::*;

/// Per-column filter predicate (case-insensitive substring match).
///
/// A row without a value for the filtered field always passes.
pub fn matches_filter(cell_value: Option<&str>, filter_text: &str) -> bool {
    match cell_value {
        None => true,
        Some(value) => value
            .to_lowercase()
            .contains(&filter_text.to_lowercase()),
    }
}

/// Поле фильтра в заголовке колонки
#[component]
pub fn ColumnFilterInput(
    /// Текущее значение фильтра
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="column-filter"
            style=move || format!(
                "width: 100%; box-sizing: border-box; padding: 2px 6px; border: 1px solid #ddd; border-radius: 4px; font-size: 13px; background: {};",
                if value.get().is_empty() { "white" } else { "#fffbea" }
            )
            prop:value=move || value.get()
            on:input=move |ev| on_change.run(event_target_value(&ev))
        />
    }
}
