#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressPhase {
    Employers,
    Vacancies,
}

#[derive(Clone, Debug)]
pub enum ProgressMessage {
    Started {
        phase: ProgressPhase,
        total: usize,
    },
    Progress {
        phase: ProgressPhase,
        current: usize,
        loaded: bool,
    },
    Finished {
        phase: ProgressPhase,
    },
}
