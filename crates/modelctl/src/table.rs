use modelctl_core::{Api, Deployment, Provider};

/// A bordered table with one width per column.
///
/// Widths grow to fit the widest cell, capped at `MAX_WIDTH`; longer cells
/// are truncated.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

const MAX_WIDTH: usize = 40;

impl TableFormatter {
    pub fn new(headers: Vec<&'static str>, rows: Vec<Vec<String>>) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_WIDTH)
            })
            .collect();

        Self {
            headers,
            widths,
            rows,
        }
    }

    pub fn for_apis(apis: &[Api]) -> Self {
        let rows = apis
            .iter()
            .map(|api| {
                vec![
                    api.resource.name.clone(),
                    api.model.clone(),
                    api.replicas.to_string(),
                    api.cpu.as_ref().map_or("-".to_string(), |q| q.to_string()),
                    api.mem.as_ref().map_or("-".to_string(), |q| q.to_string()),
                    api.gpu.to_string(),
                ]
            })
            .collect();
        Self::new(vec!["Name", "Model", "Replicas", "CPU", "Mem", "GPU"], rows)
    }

    pub fn for_deployment(deployment: &Deployment) -> Self {
        let namespace = match &deployment.provider {
            Provider::Kubernetes(k8s) => k8s.namespace.clone(),
            Provider::Local => "-".to_string(),
        };
        let row = vec![
            deployment.resource.name.clone(),
            deployment.provider.provider_type().to_string(),
            namespace,
        ];
        Self::new(vec!["Name", "Provider", "Namespace"], vec![row])
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.row(self.headers.iter().map(|h| h.to_string())));
        lines.push(self.border('├', '┼', '┤'));
        for row in &self.rows {
            lines.push(self.row(row.iter().cloned()));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    pub fn print_table(&self) {
        println!("{}", self.render());
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }

    fn row(&self, cells: impl Iterator<Item = String>) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| format!(" {} ", truncate(&cell, *width)))
            .collect();
        format!("│{}│", cells.join("│"))
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) so multi-byte characters are never split.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
