//! Exchange-correlation kernels.
//!
//! `XCKernel` is the family-agnostic interface seen by callers. Concrete
//! kernels are `BuiltinKernel`s bound to one model type (see `traits`), and
//! `XCDriver` runs any kernel over a whole grid.

pub mod builtin;
pub mod correlation;
pub mod device;
pub mod driver;
pub mod error;
pub mod exchange;
pub mod helpers;
pub mod hybrid;
pub mod kernel;
pub mod spin;
pub mod traits;

pub use builtin::{BuiltinKernel, FamilyKernel, KernelInfo};
pub use correlation::{PBECorrelation, PW92, PZ81};
pub use device::{DeviceBackend, DeviceBuffer, HostDevice, Stream};
pub use driver::{XCDriver, XCInput, XCOutput};
pub use error::{Result, XCError};
pub use exchange::{MVSExchange, PBEExchange, SlaterExchange};
pub use hybrid::PBE0;
pub use kernel::{Capabilities, XCKernel};
pub use spin::Spin;
pub use traits::{BuiltinModel, GgaKernel, KernelTraits, LdaKernel, MggaKernel, MggaPoint, XCFamily};
