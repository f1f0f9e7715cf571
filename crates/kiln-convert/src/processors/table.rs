//! Tables.

use crate::builder::{BuildContext, ElementProcessor, ElementView, ProcessorResult};
use crate::processors::set;

/// `<table>`, `<thead>`, `<tbody>`, `<tfoot>`, `<tr>` → `div {tag}`
/// containers.
pub struct TableProcessor;

impl ElementProcessor for TableProcessor {
    fn name(&self) -> &'static str {
        "table"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["table", "thead", "tbody", "tfoot", "tr"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("div", view.node);
        set(&mut node, "tag", view.tag());
        ProcessorResult::Container {
            node,
            owns_inline: false,
        }
    }
}

/// `<td>`, `<th>`, `<caption>` → terminal `text-basic {tag, text}`.
pub struct TableCellProcessor;

impl ElementProcessor for TableCellProcessor {
    fn name(&self) -> &'static str {
        "table-cell"
    }

    fn can_handle(&self, view: &ElementView<'_>) -> bool {
        view.is_any(&["td", "th", "caption"])
    }

    fn process(&self, view: ElementView<'_>, ctx: &mut BuildContext<'_>) -> ProcessorResult {
        let mut node = ctx.node("text-basic", view.node);
        set(&mut node, "tag", view.tag());
        set(&mut node, "text", view.inner_html());
        ProcessorResult::Leaf(node)
    }
}
