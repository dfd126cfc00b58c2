/// Success value returned by the boolean-style LMS calls.
pub const TRUE: &str = "true";
/// Failure value returned by the boolean-style LMS calls.
pub const FALSE: &str = "false";
/// `LMSGetLastError` code meaning the previous call succeeded.
pub const NO_ERROR: &str = "0";

/// SCORM 1.2 runtime API object that an LMS exposes as `window.API`.
///
/// Every call returns the raw string the LMS produced; callers compare
/// against [`TRUE`] and [`NO_ERROR`] themselves. Implementations use
/// interior mutability because the object is shared with the host page.
pub trait RuntimeApi {
    /// `LMSInitialize("")`
    fn initialize(&self, arg: &str) -> String;

    /// `LMSFinish("")`
    fn finish(&self, arg: &str) -> String;

    /// `LMSGetValue(element)`
    fn get_value(&self, element: &str) -> String;

    /// `LMSSetValue(element, value)`
    fn set_value(&self, element: &str, value: &str) -> String;

    /// `LMSCommit("")`
    fn commit(&self, arg: &str) -> String;

    /// `LMSGetLastError()`
    fn get_last_error(&self) -> String;
}
