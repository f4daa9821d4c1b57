/*!

Error handling for router-flow-engine. Configuration problems detected at
construction time are returned as `Result<_,Error>`; contract violations
discovered while the engine is running (see `spec.md` §7) are not recoverable
and are raised with `panic!`/`assert!` instead, matching the style the rest
of this crate is grounded on.

*/

use std::fmt::{Display,Formatter};

/// The main Error class to be used in each `Result<Whatever,Error>`.
#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

/// A source code location where an error occurred.
#[derive(Debug)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

#[derive(Debug)]
pub enum ErrorKind
{
	/// A `flow_control_scheme` configuration string did not match any known scheme.
	UnknownFlowControlScheme{ name: String },
	/// A `buffer_management_scheme` configuration string did not match any known scheme.
	UnknownBufferManagementScheme{ name: String },
	/// The number of input/output endpoint-count entries did not match the number of channels.
	InconsistentEndpointCounts{ expected: usize, found: usize },
	/// `flit_width_bits` was not a positive number.
	NonPositiveFlitWidth{ value: i64 },
}

#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{
			file: file!(),
			line: line!(),
			column: column!(),
		}
	}
}
#[macro_export]
macro_rules! error{
	($kind:ident,$($args:tt)*) => {{
		$crate::error::Error::$kind( $crate::source_location!(), $($args)* )
	}};
	($kind:ident) => {{
		$crate::error::Error::$kind( $crate::source_location!() )
	}};
}

use ErrorKind::*;

impl Error
{
	pub fn with_message(mut self, message: String) -> Error
	{
		match self.message
		{
			Some(ref mut text) => *text += &message,
			None => self.message = Some(message),
		}
		self
	}
	pub fn unknown_flow_control_scheme(source_location: SourceLocation, name: String) -> Error
	{
		Error{ source_location, kind: UnknownFlowControlScheme{ name }, message: None }
	}
	pub fn unknown_buffer_management_scheme(source_location: SourceLocation, name: String) -> Error
	{
		Error{ source_location, kind: UnknownBufferManagementScheme{ name }, message: None }
	}
	pub fn inconsistent_endpoint_counts(source_location: SourceLocation, expected: usize, found: usize) -> Error
	{
		Error{ source_location, kind: InconsistentEndpointCounts{ expected, found }, message: None }
	}
	pub fn non_positive_flit_width(source_location: SourceLocation, value: i64) -> Error
	{
		Error{ source_location, kind: NonPositiveFlitWidth{ value }, message: None }
	}
}

impl Display for Error
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), std::fmt::Error>
	{
		let Error{source_location:location,kind,message} = self;
		writeln!(formatter,"Error at file {} at line {} column {}.",location.file,location.line,location.column)?;
		if let Some(text) = message
		{
			writeln!(formatter,"{}",text)?;
		}
		kind.fmt(formatter)?;
		Ok(())
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), std::fmt::Error>
	{
		match self
		{
			UnknownFlowControlScheme{name} =>
				writeln!(formatter,"UnknownFlowControlScheme error: '{}' does not name a known flow-control scheme.",name),
			UnknownBufferManagementScheme{name} =>
				writeln!(formatter,"UnknownBufferManagementScheme error: '{}' does not name a known buffer-management scheme.",name),
			InconsistentEndpointCounts{expected,found} =>
				writeln!(formatter,"InconsistentEndpointCounts error: expected {} per-channel entries, found {}.",expected,found),
			NonPositiveFlitWidth{value} =>
				writeln!(formatter,"NonPositiveFlitWidth error: flit_width_bits must be positive, got {}.",value),
		}
	}
}

impl std::error::Error for Error {}
