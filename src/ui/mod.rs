pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    amount, empty, error, header, info, load_summary, money, salary, section, status, success,
    summary_row, vacancy_card, warn,
};
pub use progress::{ProgressManager, Spinner};
pub use progress_message::{ProgressMessage, ProgressPhase};
pub use table::TableBuilder;
pub use theme::{Theme, theme};
