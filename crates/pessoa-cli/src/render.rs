//! Plain-text rendering of person records for the terminal.

use pessoa_core::person::Person;

const HEADERS: [&str; 6] = ["ID", "Nome", "CPF", "Nascimento", "Gênero", "Email"];

fn row(person: &Person) -> [String; 6] {
  [
    person.id.to_string(),
    person.name.clone(),
    person.cpf.clone(),
    person.birth_date.format("%d/%m/%Y").to_string(),
    person.gender_label(),
    person.email.clone().unwrap_or_default(),
  ]
}

/// Render `people` as an aligned table. An empty slice renders a notice.
pub fn table(people: &[Person]) -> String {
  if people.is_empty() {
    return "Nenhuma pessoa encontrada.\n".to_string();
  }

  let rows: Vec<[String; 6]> = people.iter().map(row).collect();
  let mut widths = HEADERS.map(|h| h.chars().count());
  for r in &rows {
    for (w, cell) in widths.iter_mut().zip(r) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let mut push_line = |cells: &[&str]| {
    let line: Vec<String> = cells
      .iter()
      .zip(widths)
      .map(|(cell, w)| format!("{cell:<w$}"))
      .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
  };

  push_line(&HEADERS);
  for r in &rows {
    let cells: Vec<&str> = r.iter().map(String::as_str).collect();
    push_line(&cells);
  }
  out
}

/// Render every field of `person`, one per line.
pub fn detail(person: &Person) -> String {
  let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
  [
    format!("ID:            {}", person.id),
    format!("Nome:          {}", person.name),
    format!("CPF:           {}", person.cpf),
    format!("Nascimento:    {}", person.birth_date.format("%d/%m/%Y")),
    format!("Gênero:        {}", person.gender_label()),
    format!("Email:         {}", or_dash(&person.email)),
    format!("Naturalidade:  {}", or_dash(&person.naturality)),
    format!("Nacionalidade: {}", or_dash(&person.nationality)),
    format!("Endereço:      {}", or_dash(&person.address)),
  ]
  .join("\n")
    + "\n"
}
