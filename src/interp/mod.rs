pub mod interpmat;
pub mod locate;

pub use interpmat::{interp_point_1d, interpmat};
pub use locate::OutsidePolicy;
