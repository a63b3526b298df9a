pub use constraints::*;
pub use deduce::*;
pub use observation::*;
pub use probability::*;
pub use valuation::*;

mod constraints;
mod deduce;
mod exact;
mod observation;
mod probability;
mod relaxation;
mod valuation;
