use maud::{Markup, html};

use crate::{
    fmt::{FormattedPower, NumberFormat},
    reading::Circuit,
};

const HEADER_STYLE: &str = "border-bottom:1px solid black";
const AMOUNT_STYLE: &str = "text-align:right";

/// Render the complete HTML report.
///
/// The output depends only on the arguments.
#[must_use]
pub fn render_report(circuits: &[Circuit], number_format: NumberFormat) -> String {
    html! {
        html {
            body {
                div id="content" {
                    @for circuit in circuits {
                        (render_circuit(circuit, number_format))
                    }
                }
            }
        }
    }
    .into_string()
}

fn render_circuit(circuit: &Circuit, number_format: NumberFormat) -> Markup {
    html! {
        h1 { (circuit.display_name) }
        table rules="cols" frame="box" {
            thead {
                tr {
                    th style=(HEADER_STYLE) { "Power Type" }
                    th style=(HEADER_STYLE) { "Amount (Watts)" }
                }
            }
            tbody {
                @for (field, watts) in circuit.reading.fields() {
                    tr {
                        td { (field.description()) }
                        td style=(AMOUNT_STYLE) {
                            (FormattedPower::new(watts, number_format).to_string())
                        }
                    }
                }
            }
        }
    }
}
