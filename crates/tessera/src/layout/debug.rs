use core::fmt;

use crate::{FieldLayout, StructuredId};

/// Renders an id against a field layout as a bit table.
///
/// Created by [`Layout::describe`].
///
/// ```text
/// StructuredId {
///     raw id     : 0x008248a91ac019cd (36671638107855309)
///     layout     :
///         +--------------+----------------+------------+-------------+---------------+
///         | reserved (1) | timestamp (41) | region (4) | machine (5) | sequence (13) |
///         +--------------+----------------+------------+-------------+---------------+
///         |      0       |   8743199851   |     0      |      0      |     6605      |
///         |     0x0      |  0x20922a46b   |    0x0     |     0x0     |    0x19cd     |
///         +--------------+----------------+------------+-------------+---------------+
/// }
/// ```
///
/// [`Layout::describe`]: crate::Layout::describe
pub struct Decoded<'a> {
    layout: &'a FieldLayout,
    id: StructuredId,
}

impl<'a> Decoded<'a> {
    pub(crate) fn new(layout: &'a FieldLayout, id: StructuredId) -> Self {
        Self { layout, id }
    }
}

fn center(s: impl ToString, width: usize) -> String {
    let s = s.to_string();
    let len = s.len();
    if len >= width {
        return s;
    }
    let pad = width - len;
    let left = pad / 2;
    let right = pad - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

fn border(f: &mut fmt::Formatter<'_>, columns: &[usize]) -> fmt::Result {
    write!(f, "        +")?;
    for &w in columns {
        write!(f, "{}+", "-".repeat(w))?;
    }
    writeln!(f)
}

impl fmt::Display for Decoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<_> = self
            .layout
            .fields()
            .iter()
            .map(|field| {
                let value = field.extract(self.id.to_bits());
                (
                    format!("{} ({})", field.name(), field.bits()),
                    value.to_string(),
                    format!("0x{value:x}"),
                )
            })
            .collect();

        // Widest of label, decimal and hex, plus one space either side
        let columns: Vec<usize> = cells
            .iter()
            .map(|(label, dec, hex)| label.len().max(dec.len()).max(hex.len()) + 2)
            .collect();

        writeln!(f, "StructuredId {{")?;
        writeln!(
            f,
            "    raw id     : 0x{:016x} ({})",
            self.id.to_bits(),
            self.id
        )?;
        writeln!(f, "    layout     :")?;

        border(f, &columns)?;
        for row in 0..3 {
            write!(f, "        |")?;
            for ((label, dec, hex), &w) in cells.iter().zip(&columns) {
                let cell = match row {
                    0 => label,
                    1 => dec,
                    _ => hex,
                };
                write!(f, "{}|", center(cell, w))?;
            }
            writeln!(f)?;
            if row == 0 {
                border(f, &columns)?;
            }
        }
        border(f, &columns)?;

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::Layout;

    #[test]
    fn table_lists_every_field() {
        let layout = Layout::regional();
        let rendered = layout
            .describe(36_671_638_107_855_309.into())
            .to_string();

        assert!(rendered.starts_with("StructuredId {"));
        assert!(rendered.contains("0x008248a91ac019cd (36671638107855309)"));
        for label in [
            "reserved (1)",
            "timestamp (41)",
            "region (4)",
            "machine (5)",
            "sequence (13)",
        ] {
            assert!(rendered.contains(label), "missing {label}");
        }
        assert!(rendered.contains(" 8743199851 "));
        assert!(rendered.contains(" 0x19cd "));
    }

    #[test]
    fn negative_ids_render_their_bit_pattern() {
        let rendered = Layout::twitter().describe((-1).into()).to_string();
        assert!(rendered.contains("0xffffffffffffffff (-1)"));
        assert!(rendered.contains(" 0xfff "));
    }
}
