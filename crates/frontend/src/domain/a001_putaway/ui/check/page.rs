//! Put-away check page: last step of the put-away workflow.
//!
//! Shows everything the user chose to put away, split lines as separate rows, and lets the
//! user complete the put-away or go back to edit it.

use super::columns::Column;
use super::model::HttpPutAwayApi;
use super::row_tree::{count_leaves, ExpandedState, RowNode};
use super::state::{default_pivot_by, ResumeParams};
use super::view_model::{CheckPageEffects, PutAwayCheckVm};
use crate::shared::icons::icon;
use crate::shared::list_utils::ColumnFilterInput;
use contracts::domain::a001_putaway::{DisplayRow, PutAway};
use leptos::prelude::*;
use std::rc::Rc;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

const NOTICE_TIMEOUT_MS: u32 = 5_000;

type CheckVm = PutAwayCheckVm<HttpPutAwayApi, SignalEffects>;
type VmHandle = StoredValue<Rc<CheckVm>, LocalStorage>;

/// `CheckPageEffects` backed by page signals and the host's navigation callbacks
#[derive(Clone, Copy)]
pub struct SignalEffects {
    loading: RwSignal<bool>,
    notice: RwSignal<Option<String>>,
    revision: RwSignal<u64>,
    on_first_page: Callback<()>,
    on_prev_page: Callback<ResumeParams>,
}

impl CheckPageEffects for SignalEffects {
    fn show_spinner(&self) {
        self.loading.set(true);
    }

    fn hide_spinner(&self) {
        self.loading.set(false);
    }

    fn notify_success(&self, message: &str) {
        self.notice.set(Some(message.to_string()));
        let notice = self.notice;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
            notice.set(None);
        });
    }

    fn first_page(&self) {
        self.on_first_page.run(());
    }

    fn prev_page(&self, params: ResumeParams) {
        self.on_prev_page.run(params);
    }

    fn state_changed(&self) {
        self.revision.update(|r| *r += 1);
    }
}

/// Reads the VM from a reactive context; subscribes the caller to state changes
fn read_vm<R>(vm: VmHandle, revision: RwSignal<u64>, f: impl FnOnce(&CheckVm) -> R) -> R {
    revision.track();
    vm.with_value(|vm| f(&**vm))
}

#[component]
pub fn PutAwayCheckPage(
    /// Put-away chosen on the previous steps
    put_away: PutAway,
    /// Current location; scopes the completion request
    #[prop(into)]
    location_id: String,
    #[prop(default = default_pivot_by())]
    pivot_by: Vec<String>,
    #[prop(optional)]
    expanded: ExpandedState,
    /// Back to the put-away list
    #[prop(into)]
    on_first_page: Callback<()>,
    /// Back to the previous step, with what is needed to restore this one
    #[prop(into)]
    on_prev_page: Callback<ResumeParams>,
) -> impl IntoView {
    let effects = SignalEffects {
        loading: RwSignal::new(false),
        notice: RwSignal::new(None),
        revision: RwSignal::new(0),
        on_first_page,
        on_prev_page,
    };
    let loading = effects.loading;
    let notice = effects.notice;
    let revision = effects.revision;

    let vm: VmHandle = StoredValue::new_local(Rc::new(PutAwayCheckVm::new(
        put_away,
        pivot_by,
        expanded,
        location_id,
        HttpPutAwayApi,
        effects,
    )));

    let title = move || read_vm(vm, revision, |vm| vm.with_state(|s| s.title()));
    let grouping_label =
        move || read_vm(vm, revision, |vm| vm.with_state(|s| s.grouping_label()));

    view! {
        <div id="a001_putaway--check" class="page page--detail" data-page-category="detail">
            <div class="page__header">
                <div class="page__header-left">
                    <h1>{title}</h1>
                </div>
            </div>

            {move || notice.get().map(|message| view! {
                <div style="margin-bottom: var(--spacing-md);">
                    <MessageBar intent=MessageBarIntent::Success>{message}</MessageBar>
                </div>
            })}

            <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px;">
                <div style="display: flex; align-items: center; gap: 8px;">
                    "Show by:"
                    <Button
                        appearance=ButtonAppearance::Primary
                        size=ButtonSize::Small
                        on_click=move |_| vm.with_value(|vm| vm.toggle_grouping())
                    >
                        {icon("layers")}
                        " "
                        {grouping_label}
                    </Button>
                </div>
                {move || actions(vm, revision)}
            </div>

            <Show when=move || loading.get()>
                <div style="display: flex; align-items: center; gap: 8px; padding: 8px 0;">
                    <Spinner size=SpinnerSize::Small />
                    <span>"Saving..."</span>
                </div>
            </Show>

            <div class="page__content" style="height: 500px; overflow: auto;">
                <Table>
                    <TableHeader>
                        <TableRow>
                            {Column::ALL
                                .into_iter()
                                .map(|column| view! {
                                    <TableHeaderCell resizable=true min_width=90.0>
                                        {column.header()}
                                    </TableHeaderCell>
                                })
                                .collect_view()}
                        </TableRow>
                        <TableRow>
                            {Column::ALL
                                .into_iter()
                                .map(|column| {
                                    let value = Signal::derive(move || {
                                        read_vm(vm, revision, |vm| {
                                            vm.with_state(|s| s.filters().get(column).to_string())
                                        })
                                    });
                                    let on_change = Callback::new(move |text: String| {
                                        vm.with_value(|vm| vm.set_filter(column, text))
                                    });
                                    view! {
                                        <TableHeaderCell>
                                            <ColumnFilterInput value=value on_change=on_change />
                                        </TableHeaderCell>
                                    }
                                })
                                .collect_view()}
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || read_vm(vm, revision, |check| {
                                check.with_state(|s| {
                                    body_lines(&check.visible_rows(), s.expanded(), s.min_rows())
                                })
                            })
                            key=|line| line.key()
                            children=move |line| render_line(vm, line)
                        />
                    </TableBody>
                </Table>
            </div>

            <div style="display: flex; justify-content: flex-end; margin-top: 8px;">
                {move || actions(vm, revision)}
            </div>
        </div>
    }
}

/// Reviewing: Edit / Complete Put Away; completed: back to the list
fn actions(vm: VmHandle, revision: RwSignal<u64>) -> AnyView {
    let completed = read_vm(vm, revision, |vm| vm.with_state(|s| s.is_completed()));

    if completed {
        view! {
            <Button
                appearance=ButtonAppearance::Secondary
                size=ButtonSize::Small
                on_click=move |_| vm.with_value(|vm| vm.go_to_first_page())
            >
                {icon("arrow-left")}
                " Go back to put-away list"
            </Button>
        }
        .into_any()
    } else {
        view! {
            <div style="display: flex; gap: 8px;">
                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| vm.with_value(|vm| vm.edit())
                >
                    {icon("edit")}
                    " Edit"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| {
                        let vm = vm.get_value();
                        spawn_local(async move { vm.complete().await });
                    }
                >
                    {icon("check")}
                    " Complete Put Away"
                </Button>
            </div>
        }
        .into_any()
    }
}

/// One line of the table body
#[derive(Debug, Clone, PartialEq)]
enum BodyLine {
    Group {
        index: usize,
        label: String,
        count: usize,
        is_open: bool,
    },
    Leaf(DisplayRow),
    Padding(usize),
}

impl BodyLine {
    fn key(&self) -> String {
        match self {
            BodyLine::Group {
                index,
                label,
                count,
                is_open,
            } => format!("group_{index}_{label}_{count}_{is_open}"),
            BodyLine::Leaf(row) => row.row_id.clone().unwrap_or_default(),
            BodyLine::Padding(n) => format!("pad_{n}"),
        }
    }
}

fn body_lines(nodes: &[RowNode], expanded: &ExpandedState, min_rows: usize) -> Vec<BodyLine> {
    let mut lines = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        match &node.row {
            Some(row) => lines.push(BodyLine::Leaf(row.clone())),
            None => {
                let is_open = expanded.get(&index.to_string()).copied().unwrap_or(false);
                lines.push(BodyLine::Group {
                    index,
                    label: node.key.clone(),
                    count: count_leaves(std::slice::from_ref(node)),
                    is_open,
                });
                if is_open {
                    collect_leaves(node, &mut lines);
                }
            }
        }
    }

    // Пустые строки, чтобы таблица не схлопывалась
    let filled = lines.len();
    lines.extend((filled..min_rows).map(BodyLine::Padding));

    lines
}

fn collect_leaves(node: &RowNode, out: &mut Vec<BodyLine>) {
    if let Some(row) = &node.row {
        out.push(BodyLine::Leaf(row.clone()));
    }
    for child in node.sub_rows.iter().flatten() {
        collect_leaves(child, out);
    }
}

fn render_line(vm: VmHandle, line: BodyLine) -> AnyView {
    match line {
        BodyLine::Group {
            index,
            label,
            count,
            is_open,
        } => render_group_header(vm, index, label, count, is_open),
        BodyLine::Leaf(row) => render_leaf(&row),
        BodyLine::Padding(_) => render_padding_row(),
    }
}

fn render_group_header(
    vm: VmHandle,
    index: usize,
    label: String,
    count: usize,
    is_open: bool,
) -> AnyView {
    let label = if label.is_empty() {
        "(none)".to_string()
    } else {
        label
    };

    view! {
        <TableRow
            on:click=move |_| vm.with_value(|vm| vm.toggle_group(index))
            attr:style="cursor: pointer; background: var(--colorNeutralBackground2);"
        >
            <TableCell attr:colspan={Column::ALL.len().to_string()}>
                <TableCellLayout>
                    <span style="display: inline-flex; align-items: center; gap: 6px; font-weight: 600;">
                        {if is_open { icon("chevron-down") } else { icon("chevron-right") }}
                        {label}
                        <span style="color: #888; font-weight: 400;">{format!("({})", count)}</span>
                    </span>
                </TableCellLayout>
            </TableCell>
        </TableRow>
    }
    .into_any()
}

fn render_leaf(row: &DisplayRow) -> AnyView {
    let cells = Column::ALL
        .into_iter()
        .map(|column| {
            let text = column.display(row);
            view! {
                <TableCell>
                    <TableCellLayout>{text}</TableCellLayout>
                </TableCell>
            }
        })
        .collect_view();

    view! { <TableRow>{cells}</TableRow> }.into_any()
}

fn render_padding_row() -> AnyView {
    let cells = Column::ALL
        .into_iter()
        .map(|_| view! { <TableCell>"\u{a0}"</TableCell> })
        .collect_view();

    view! { <TableRow>{cells}</TableRow> }.into_any()
}
