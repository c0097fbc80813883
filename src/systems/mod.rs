mod citizens;
mod pollution;

pub use citizens::CitizenSystem;
pub use pollution::PollutionSystem;
