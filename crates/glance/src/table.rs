use glance_core::SessionRecord;

pub struct TableFormatter {
    session_width: usize,
    player_width: usize,
    level_width: usize,
    max_level_width: usize,
    idle_width: usize,
}

impl TableFormatter {
    pub fn new(records: &[SessionRecord]) -> Self {
        let session_width = records
            .iter()
            .map(|r| r.session_id.len())
            .max()
            .unwrap_or(12)
            .clamp(7, 40); // Between "Session" header min and reasonable terminal width max

        Self {
            session_width,
            player_width: 8,
            level_width: 5,
            max_level_width: 5,
            idle_width: 8,
        }
    }

    pub fn print_table(&self, records: &[SessionRecord]) {
        self.print_header();
        for record in records {
            self.print_row(record);
        }
        self.print_footer();
    }

    fn print_header(&self) {
        println!("{}", self.top_border());
        println!("{}", self.header_row());
        println!("{}", self.separator());
    }

    fn print_footer(&self) {
        println!("{}", self.bottom_border());
    }

    fn print_row(&self, record: &SessionRecord) {
        // Classroom-scoped listings report a username instead of a player id.
        let player = record
            .player_id
            .as_deref()
            .or(record.username.as_deref())
            .unwrap_or("-");
        let level = record
            .cur_level
            .map_or("-".to_string(), |lvl| lvl.to_string());
        let max_level = record
            .max_level
            .map_or("-".to_string(), |lvl| lvl.to_string());
        let idle = record
            .idle_time
            .map_or("-".to_string(), |secs| format!("{:.0}s", secs));

        println!(
            "│ {:<width_session$} │ {:<width_player$} │ {:>width_level$} │ {:>width_max$} │ {:>width_idle$} │",
            truncate(&record.session_id, self.session_width),
            truncate(player, self.player_width),
            truncate(&level, self.level_width),
            truncate(&max_level, self.max_level_width),
            truncate(&idle, self.idle_width),
            width_session = self.session_width,
            width_player = self.player_width,
            width_level = self.level_width,
            width_max = self.max_level_width,
            width_idle = self.idle_width,
        );
    }

    fn top_border(&self) -> String {
        format!(
            "┌{}┬{}┬{}┬{}┬{}┐",
            "─".repeat(self.session_width + 2),
            "─".repeat(self.player_width + 2),
            "─".repeat(self.level_width + 2),
            "─".repeat(self.max_level_width + 2),
            "─".repeat(self.idle_width + 2),
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_session$} │ {:<width_player$} │ {:>width_level$} │ {:>width_max$} │ {:>width_idle$} │",
            "Session",
            "Player",
            "Level",
            "Max",
            "Idle",
            width_session = self.session_width,
            width_player = self.player_width,
            width_level = self.level_width,
            width_max = self.max_level_width,
            width_idle = self.idle_width,
        )
    }

    fn separator(&self) -> String {
        format!(
            "├{}┼{}┼{}┼{}┼{}┤",
            "─".repeat(self.session_width + 2),
            "─".repeat(self.player_width + 2),
            "─".repeat(self.level_width + 2),
            "─".repeat(self.max_level_width + 2),
            "─".repeat(self.idle_width + 2),
        )
    }

    fn bottom_border(&self) -> String {
        format!(
            "└{}┴{}┴{}┴{}┴{}┘",
            "─".repeat(self.session_width + 2),
            "─".repeat(self.player_width + 2),
            "─".repeat(self.level_width + 2),
            "─".repeat(self.max_level_width + 2),
            "─".repeat(self.idle_width + 2),
        )
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else if width > 1 {
        let prefix: String = text.chars().take(width - 1).collect();
        format!("{}…", prefix)
    } else {
        text.chars().take(width).collect()
    }
}
