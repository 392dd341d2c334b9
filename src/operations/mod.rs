mod coalesce;
mod resample;
mod simplify;

pub use coalesce::Coalesce;
pub use simplify::Simplify;
