use crate::models::Expense;

/// Renders the fixed-width expense table with a trailing total. Amounts
/// above 1000 are flagged in the BIG? column. The total is a plain
/// floating-point sum displayed without extra rounding.
pub fn render_report(expenses: &[Expense]) -> String {
    let mut out = String::from("-ID--AMOUNT--BIG?--------DESCRIPTION-------\n");
    let mut total = 0.0;
    for expense in expenses {
        let marker = if expense.amount > 1000.0 { "(!)" } else { " - " };
        out.push_str(&format!(
            "{:3} {:7} {:>4}     {}\n",
            expense.id.unwrap_or(0),
            expense.amount,
            marker,
            expense.description
        ));
        total += expense.amount;
    }
    out.push_str(&format!("TOTAL = {total}\n"));
    out
}

/// Renders the whole list as one debug-formatted line.
pub fn render_export(expenses: &[Expense]) -> String {
    format!("{expenses:?}")
}
