//! URL parser implementation
//!
//! The spec defines the parser as a state machine over the code points of
//! the (preprocessed) input. A pointer indexes the current code point and
//! may be moved backwards, so the input is kept as an explicit array of
//! code points instead of an iterator.

use std::mem;

use crate::{
    host::{self, Host, HostParseError},
    path::Path,
    percent_encode::{
        is_c0_percent_encode_set, is_fragment_percent_encode_set, is_path_percent_encode_set,
        is_query_percent_encode_set, is_special_query_percent_encode_set,
        is_userinfo_percent_encode_set, percent_encode,
    },
    url::{default_port_for_scheme, is_special_scheme, Port, URL},
    util,
    validation::{ValidationError, ValidationErrorHandler},
};

#[derive(Clone, Copy, Debug)]
pub(crate) enum Error {
    /// Generic Error
    Failure,

    /// Failed to parse host
    HostParse(HostParseError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum URLParserState {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
}

/// Cursor over the code points of the preprocessed input
///
/// The position is signed: handlers may step one before the start (the
/// next advance re-examines the first code point) and the main loop runs
/// one past the end to process the EOF sentinel.
pub(crate) struct InputStream {
    code_points: Vec<char>,
    position: isize,
}

impl InputStream {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            code_points: input.chars().collect(),
            position: 0,
        }
    }

    fn current(&self) -> Option<char> {
        usize::try_from(self.position)
            .ok()
            .and_then(|index| self.code_points.get(index))
            .copied()
    }

    /// The code points after the current one
    fn remaining(&self) -> &[char] {
        let next_index = (self.position + 1).max(0) as usize;
        self.code_points.get(next_index..).unwrap_or(&[])
    }

    /// The code points from the current one to the end of the input
    fn from_current(&self) -> &[char] {
        let index = self.position.max(0) as usize;
        self.code_points.get(index..).unwrap_or(&[])
    }

    fn next(&mut self) {
        self.position += 1;
    }

    fn go_back(&mut self) {
        self.position -= 1;
    }

    fn go_back_n(&mut self, n: usize) {
        self.position -= n as isize;
    }

    fn set_position(&mut self, position: isize) {
        self.position = position;
    }

    fn is_past_end(&self) -> bool {
        self.position >= self.code_points.len() as isize
    }
}

pub(crate) struct URLParser<'a, H> {
    pub(crate) url: URL,
    pub(crate) base: Option<URL>,
    pub(crate) input: InputStream,
    pub(crate) state: URLParserState,

    /// A temporary character buffer used during parsing
    ///
    /// Notably, unlike everything in a URL, this can contain unicode data
    pub(crate) buffer: String,
    pub(crate) state_override: Option<URLParserState>,
    pub(crate) at_sign_seen: bool,
    pub(crate) inside_brackets: bool,
    pub(crate) password_token_seen: bool,
    pub(crate) error_handler: &'a mut H,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepResult {
    /// Advance the pointer and keep going
    Continue,

    /// Reparse from the first code point of the input
    StartOver,

    /// Terminate the parse successfully
    Finish,
}

impl<'a, H> URLParser<'a, H>
where
    H: ValidationErrorHandler,
{
    pub(crate) fn run_to_completion(mut self) -> Result<Self, Error> {
        loop {
            // Keep running the following state machine by switching on state.
            match self.step()? {
                StepResult::Continue => {},
                StepResult::StartOver => {
                    self.input.set_position(0);
                    continue;
                },
                StepResult::Finish => break,
            }

            // If after a run pointer points to the EOF code point
            if self.input.is_past_end() {
                // go to the next step
                break;
            }
            // Otherwise,
            else {
                // increase pointer by 1 and continue with the state machine.
                self.input.next();
            }
        }
        Ok(self)
    }

    #[inline]
    fn set_state(&mut self, new_state: URLParserState) {
        self.state = new_state;
    }

    #[inline]
    fn validation_error(&mut self, error: ValidationError) {
        self.error_handler.validation_error(error);
    }

    fn step(&mut self) -> Result<StepResult, Error> {
        match self.state {
            // https://url.spec.whatwg.org/#scheme-start-state
            URLParserState::SchemeStart => {
                let c = self.input.current();

                // If c is an ASCII alpha,
                if let Some(c) = c.filter(char::is_ascii_alphabetic) {
                    // Append c, lowercased, to buffer,
                    self.buffer.push(c.to_ascii_lowercase());

                    // and set state to scheme state.
                    self.set_state(URLParserState::Scheme);
                }
                // Otherwise, if state override is not given
                else if self.state_override.is_none() {
                    // set state to no scheme state
                    self.set_state(URLParserState::NoScheme);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
                // Otherwise,
                else {
                    // return failure.
                    return Err(Error::Failure);
                }
            },
            // https://url.spec.whatwg.org/#scheme-state
            URLParserState::Scheme => {
                let c = self.input.current();

                // If c is an ASCII alphanumeric, U+002B (+), U+002D (-), or U+002E (.),
                if let Some(c) = c
                    .filter(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '+' | '-' | '.'))
                {
                    // Append c, lowercased, to buffer
                    self.buffer.push(c.to_ascii_lowercase());
                }
                // Otherwise, if c is U+003A (:), then:
                else if c == Some(':') {
                    // If state override is given, then:
                    if self.state_override.is_some() {
                        // If url’s scheme is a special scheme and buffer is not
                        // a special scheme (or vice versa), then return.
                        if self.url.is_special() != is_special_scheme(&self.buffer) {
                            return Ok(StepResult::Finish);
                        }

                        // If url includes credentials or has a non-null port,
                        // and buffer is "file", then return.
                        if (self.url.includes_credentials() || self.url.port.is_some())
                            && self.buffer == "file"
                        {
                            return Ok(StepResult::Finish);
                        }

                        // If url’s scheme is "file" and its host is an empty host, then return.
                        if self.url.scheme == "file" && matches!(self.url.host, Some(Host::Empty)) {
                            return Ok(StepResult::Finish);
                        }
                    }

                    // Set url’s scheme to buffer.
                    self.url.scheme = mem::take(&mut self.buffer);

                    // If state override is given, then:
                    if self.state_override.is_some() {
                        // If url’s port is url’s scheme’s default port,
                        if self.url.port == default_port_for_scheme(&self.url.scheme) {
                            // then set url’s port to null.
                            self.url.port = None;
                        }

                        // Return.
                        return Ok(StepResult::Finish);
                    }

                    // If url’s scheme is "file", then:
                    if self.url.scheme == "file" {
                        // If remaining does not start with "//", validation error.
                        if !self.input.remaining().starts_with(&['/', '/']) {
                            self.validation_error(
                                ValidationError::SpecialSchemeMissingFollowingSolidus,
                            );
                        }

                        // Set state to file state.
                        self.set_state(URLParserState::File);
                    }
                    // Otherwise, if url is special, base is non-null, and base’s scheme is url’s scheme:
                    else if self.url.is_special()
                        && self
                            .base
                            .as_ref()
                            .map(URL::scheme)
                            .is_some_and(|scheme| scheme == self.url.scheme)
                    {
                        // Assert: base is special (and therefore does not have an opaque path).
                        debug_assert!(self.base.as_ref().is_some_and(URL::is_special));

                        // Set state to special relative or authority state.
                        self.set_state(URLParserState::SpecialRelativeOrAuthority);
                    }
                    // Otherwise, if url is special
                    else if self.url.is_special() {
                        // set state to special authority slashes state.
                        self.set_state(URLParserState::SpecialAuthoritySlashes);
                    }
                    // Otherwise, if remaining starts with an U+002F (/)
                    else if self.input.remaining().first() == Some(&'/') {
                        // set state to path or authority state and increase pointer by 1.
                        self.set_state(URLParserState::PathOrAuthority);
                        self.input.next();
                    }
                    // Otherwise,
                    else {
                        // set url’s path to the empty string
                        self.url.path = Path::Opaque(String::new());

                        // and set state to opaque path state.
                        self.set_state(URLParserState::OpaquePath);
                    }
                }
                // Otherwise, if state override is not given
                else if self.state_override.is_none() {
                    // set buffer to the empty string,
                    self.buffer.clear();

                    // state to no scheme state,
                    self.set_state(URLParserState::NoScheme);

                    // and start over (from the first code point in input).
                    return Ok(StepResult::StartOver);
                }
                // Otherwise,
                else {
                    // return failure.
                    return Err(Error::Failure);
                }
            },
            // https://url.spec.whatwg.org/#no-scheme-state
            URLParserState::NoScheme => {
                let c = self.input.current();

                // If base is null, or base has an opaque path and c is not U+0023 (#),
                if self.base.is_none()
                    || (self.base.as_ref().is_some_and(URL::cannot_be_a_base) && c != Some('#'))
                {
                    // missing-scheme-non-relative-URL validation error,
                    self.validation_error(ValidationError::MissingSchemeNonRelativeURL);

                    // return failure.
                    return Err(Error::Failure);
                }
                let base = self
                    .base
                    .as_ref()
                    .expect("base cannot be none, the previous step returns failure");

                // Otherwise, if base has an opaque path and c is U+0023 (#)
                if base.cannot_be_a_base() && c == Some('#') {
                    // set url’s scheme to base’s scheme,
                    self.url.scheme.clone_from(&base.scheme);

                    // url’s path to base’s path,
                    self.url.path.clone_from(&base.path);

                    // url’s query to base’s query,
                    self.url.query.clone_from(&base.query);

                    // url’s fragment to the empty string,
                    self.url.fragment = Some(String::new());

                    // and set state to fragment state.
                    self.set_state(URLParserState::Fragment);
                }
                // Otherwise, if base’s scheme is not "file"
                else if base.scheme != "file" {
                    // set state to relative state
                    self.set_state(URLParserState::Relative);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
                // Otherwise,
                else {
                    // set state to file state
                    self.set_state(URLParserState::File);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#special-relative-or-authority-state
            URLParserState::SpecialRelativeOrAuthority => {
                // If c is U+002F (/) and remaining starts with U+002F (/)
                if self.input.current() == Some('/')
                    && self.input.remaining().first() == Some(&'/')
                {
                    // then set state to special authority ignore slashes state
                    self.set_state(URLParserState::SpecialAuthorityIgnoreSlashes);

                    // and increase pointer by 1.
                    self.input.next();
                }
                // Otherwise,
                else {
                    // special-scheme-missing-following-solidus validation error,
                    self.validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);

                    // set state to relative state
                    self.set_state(URLParserState::Relative);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#path-or-authority-state
            URLParserState::PathOrAuthority => {
                // if c is U+002F (/),
                if self.input.current() == Some('/') {
                    // then set state to authority state.
                    self.set_state(URLParserState::Authority);
                }
                // Otherwise,
                else {
                    // set state to path state,
                    self.set_state(URLParserState::Path);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#relative-state
            URLParserState::Relative => {
                // Assert: base’s scheme is not "file".
                let base = match &self.base {
                    Some(url) if url.scheme != "file" => url,
                    _ => unreachable!("relative state requires a non-file base"),
                };

                // Set url’s scheme to base’s scheme.
                self.url.scheme.clone_from(&base.scheme);

                let c = self.input.current();

                // If c is U+002F (/)
                if c == Some('/') {
                    // then set state to relative slash state.
                    self.set_state(URLParserState::RelativeSlash);
                }
                // Otherwise, if url is special and c is U+005C (\)
                else if self.url.is_special() && c == Some('\\') {
                    // invalid-reverse-solidus validation error,
                    self.validation_error(ValidationError::InvalidReverseSolidus);

                    // set state to relative slash state.
                    self.set_state(URLParserState::RelativeSlash);
                }
                // Otherwise:
                else {
                    let base = match &self.base {
                        Some(url) => url,
                        None => unreachable!("relative state requires a base"),
                    };

                    // Set url’s username to base’s username
                    self.url.username.clone_from(&base.username);

                    // url’s password to base’s password
                    self.url.password.clone_from(&base.password);

                    // url’s host to base’s host
                    self.url.host.clone_from(&base.host);

                    // url’s port to base’s port
                    self.url.port = base.port;

                    // url’s path to a clone of base’s path
                    self.url.path.clone_from(&base.path);

                    // and url’s query to base’s query.
                    self.url.query.clone_from(&base.query);

                    // If c is U+003F (?)
                    if c == Some('?') {
                        // then set url’s query to the empty string,
                        self.url.query = Some(String::new());

                        // and state to query state.
                        self.set_state(URLParserState::Query);
                    }
                    // Otherwise, if c is U+0023 (#)
                    else if c == Some('#') {
                        // set url’s fragment to the empty string
                        self.url.fragment = Some(String::new());

                        // and state to fragment state.
                        self.set_state(URLParserState::Fragment);
                    }
                    // Otherwise, if c is not the EOF code point:
                    else if c.is_some() {
                        // Set url’s query to null.
                        self.url.query = None;

                        // Shorten url’s path.
                        self.url.shorten_path();

                        // Set state to path state
                        self.set_state(URLParserState::Path);

                        // and decrease pointer by 1.
                        self.input.go_back();
                    }
                }
            },
            // https://url.spec.whatwg.org/#relative-slash-state
            URLParserState::RelativeSlash => {
                let c = self.input.current();

                // If url is special and c is U+002F (/) or U+005C (\), then:
                if self.url.is_special() && matches!(c, Some('/' | '\\')) {
                    // If c is U+005C (\), invalid-reverse-solidus validation error.
                    if c == Some('\\') {
                        self.validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    // Set state to special authority ignore slashes state.
                    self.set_state(URLParserState::SpecialAuthorityIgnoreSlashes);
                }
                // Otherwise, if c is U+002F (/)
                else if c == Some('/') {
                    // then set state to authority state.
                    self.set_state(URLParserState::Authority);
                }
                // Otherwise
                else {
                    let base = self
                        .base
                        .as_ref()
                        .expect("relative slash state requires a base");

                    // set url’s username to base’s username,
                    self.url.username.clone_from(&base.username);

                    // url’s password to base’s password,
                    self.url.password.clone_from(&base.password);

                    // url’s host to base’s host,
                    self.url.host.clone_from(&base.host);

                    // url’s port to base’s port,
                    self.url.port = base.port;

                    // state to path state,
                    self.set_state(URLParserState::Path);

                    // and then, decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#special-authority-slashes-state
            URLParserState::SpecialAuthoritySlashes => {
                // If c is U+002F (/) and remaining starts with U+002F (/)
                if self.input.current() == Some('/')
                    && self.input.remaining().first() == Some(&'/')
                {
                    // then set state to special authority ignore slashes state
                    self.set_state(URLParserState::SpecialAuthorityIgnoreSlashes);

                    // and increase pointer by 1.
                    self.input.next();
                }
                // Otherwise
                else {
                    // special-scheme-missing-following-solidus validation error,
                    self.validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);

                    // set state to special authority ignore slashes state
                    self.set_state(URLParserState::SpecialAuthorityIgnoreSlashes);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#special-authority-ignore-slashes-state
            URLParserState::SpecialAuthorityIgnoreSlashes => {
                // If c is neither U+002F (/) nor U+005C (\)
                if !matches!(self.input.current(), Some('/' | '\\')) {
                    // then set state to authority state
                    self.set_state(URLParserState::Authority);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
                // Otherwise,
                else {
                    // special-scheme-missing-following-solidus validation error.
                    self.validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);
                }
            },
            // https://url.spec.whatwg.org/#authority-state
            URLParserState::Authority => {
                let c = self.input.current();

                // If c is U+0040 (@), then:
                if c == Some('@') {
                    // invalid-credentials validation error.
                    self.validation_error(ValidationError::InvalidCredentials);

                    // If atSignSeen is true,
                    if self.at_sign_seen {
                        // then prepend "%40" to buffer.
                        self.buffer.insert_str(0, "%40");
                    }

                    // Set atSignSeen to true.
                    self.at_sign_seen = true;

                    // For each codePoint in buffer:
                    for code_point in self.buffer.chars() {
                        // If codePoint is U+003A (:) and passwordTokenSeen is false
                        if code_point == ':' && !self.password_token_seen {
                            // then set passwordTokenSeen to true and continue.
                            self.password_token_seen = true;
                            continue;
                        }

                        // Let encodedCodePoints be the result of running
                        // UTF-8 percent-encode codePoint using
                        // the userinfo percent-encode set.

                        // If passwordTokenSeen is true
                        let append_to = if self.password_token_seen {
                            // then append encodedCodePoints to url’s password.
                            &mut self.url.password
                        } else {
                            // Otherwise, append encodedCodePoints to url’s username.
                            &mut self.url.username
                        };

                        let mut utf8_buffer = [0; 4];
                        let encoded_char = code_point.encode_utf8(&mut utf8_buffer);
                        percent_encode(
                            encoded_char.as_bytes(),
                            is_userinfo_percent_encode_set,
                            append_to,
                        );
                    }

                    // Set buffer to the empty string.
                    self.buffer.clear();
                }
                // Otherwise, if one of the following is true:
                // * c is the EOF code point, U+002F (/), U+003F (?), or U+0023 (#)
                // * url is special and c is U+005C (\)
                else if matches!(c, None | Some('/' | '?' | '#'))
                    || (self.url.is_special() && c == Some('\\'))
                {
                    // If atSignSeen is true and buffer is the empty string
                    if self.at_sign_seen && self.buffer.is_empty() {
                        // host-missing validation error,
                        self.validation_error(ValidationError::HostMissing);

                        // return failure.
                        return Err(Error::Failure);
                    }

                    // Decrease pointer by the number of code points in buffer plus one,
                    self.input.go_back_n(self.buffer.chars().count() + 1);

                    // set buffer to the empty string,
                    self.buffer.clear();

                    // and set state to host state.
                    self.set_state(URLParserState::Host);
                }
                // Otherwise
                else {
                    // append c to buffer.
                    self.buffer
                        .push(c.expect("the previous step catches EOF code points"));
                }
            },
            // https://url.spec.whatwg.org/#host-state
            // https://url.spec.whatwg.org/#hostname-state
            URLParserState::Host | URLParserState::Hostname => {
                let c = self.input.current();

                // If state override is given and url’s scheme is "file",
                if self.state_override.is_some() && self.url.scheme == "file" {
                    // then decrease pointer by 1
                    self.input.go_back();

                    // and set state to file host state.
                    self.set_state(URLParserState::FileHost);
                }
                // Otherwise, if c is U+003A (:) and insideBrackets is false
                else if c == Some(':') && !self.inside_brackets {
                    // If buffer is the empty string
                    if self.buffer.is_empty() {
                        // host-missing validation error,
                        self.validation_error(ValidationError::HostMissing);

                        // return failure.
                        return Err(Error::Failure);
                    }

                    // If state override is given and state override is hostname state
                    if self.state_override == Some(URLParserState::Hostname) {
                        // then return.
                        return Ok(StepResult::Finish);
                    }

                    // Let host be the result of host parsing buffer with url is not special.
                    // If host is failure, then return failure.
                    let host = host::host_parse(
                        &self.buffer,
                        !self.url.is_special(),
                        &mut *self.error_handler,
                    )?;

                    // Set url’s host to host,
                    self.url.host = Some(host);

                    // buffer to the empty string,
                    self.buffer.clear();

                    // and state to port state.
                    self.set_state(URLParserState::Port);
                }
                // Otherwise, if one of the following is true:
                // * c is the EOF code point, U+002F (/), U+003F (?), or U+0023 (#)
                // * url is special and c is U+005C (\)
                else if matches!(c, None | Some('/' | '?' | '#'))
                    || (self.url.is_special() && c == Some('\\'))
                {
                    // then decrease pointer by 1,
                    self.input.go_back();

                    // and then:
                    // If url is special and buffer is the empty string
                    if self.url.is_special() && self.buffer.is_empty() {
                        // host-missing validation error,
                        self.validation_error(ValidationError::HostMissing);

                        // return failure.
                        return Err(Error::Failure);
                    }

                    // Otherwise, if state override is given, buffer is the empty string,
                    // and either url includes credentials or url’s port is non-null
                    if self.state_override.is_some()
                        && self.buffer.is_empty()
                        && (self.url.includes_credentials() || self.url.port.is_some())
                    {
                        // then return.
                        return Ok(StepResult::Finish);
                    }

                    // Let host be the result of host parsing buffer with url is not special.
                    // If host is failure, then return failure.
                    let host = host::host_parse(
                        &self.buffer,
                        !self.url.is_special(),
                        &mut *self.error_handler,
                    )?;

                    // Set url’s host to host,
                    self.url.host = Some(host);

                    // buffer to the empty string,
                    self.buffer.clear();

                    // and state to path start state.
                    self.set_state(URLParserState::PathStart);

                    // If state override is given, then return.
                    if self.state_override.is_some() {
                        return Ok(StepResult::Finish);
                    }
                }
                // Otherwise:
                else {
                    // If c is U+005B ([),
                    if c == Some('[') {
                        // then set insideBrackets to true.
                        self.inside_brackets = true;
                    }
                    // If c is U+005D (])
                    else if c == Some(']') {
                        // then set insideBrackets to false.
                        self.inside_brackets = false;
                    }

                    // Append c to buffer.
                    self.buffer
                        .push(c.expect("the previous step catches EOF code points"));
                }
            },
            // https://url.spec.whatwg.org/#port-state
            URLParserState::Port => {
                let c = self.input.current();

                // If c is an ASCII digit
                if let Some(ascii_digit) = c.filter(char::is_ascii_digit) {
                    // append c to buffer.
                    self.buffer.push(ascii_digit);
                }
                // Otherwise, if one of the following is true:
                // * c is the EOF code point, U+002F (/), U+003F (?), or U+0023 (#)
                // * url is special and c is U+005C (\)
                // * state override is given
                else if matches!(c, None | Some('/' | '?' | '#'))
                    || (self.url.is_special() && c == Some('\\'))
                    || self.state_override.is_some()
                {
                    // If buffer is not the empty string, then:
                    if !self.buffer.is_empty() {
                        // Let port be the mathematical integer value that is
                        // represented by buffer in radix-10.

                        // If port is greater than 2^16 − 1
                        let port = self
                            .buffer
                            .parse::<u32>()
                            .ok()
                            .filter(|&port| port <= Port::MAX.into());

                        let Some(port) = port else {
                            // port-out-of-range validation error,
                            self.validation_error(ValidationError::PortOutOfRange);

                            // return failure.
                            return Err(Error::Failure);
                        };
                        let port = port as Port;

                        // Set url’s port to null, if port is url’s scheme’s default port;
                        // otherwise to port.
                        if default_port_for_scheme(&self.url.scheme) == Some(port) {
                            self.url.port = None;
                        } else {
                            self.url.port = Some(port);
                        }

                        // Set buffer to the empty string.
                        self.buffer.clear();
                    }

                    // If state override is given, then return.
                    if self.state_override.is_some() {
                        return Ok(StepResult::Finish);
                    }

                    // Set state to path start state
                    self.set_state(URLParserState::PathStart);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
                // Otherwise
                else {
                    // port-invalid validation error,
                    self.validation_error(ValidationError::PortInvalid);

                    // return failure.
                    return Err(Error::Failure);
                }
            },
            // https://url.spec.whatwg.org/#file-state
            URLParserState::File => {
                // Set url’s scheme to "file".
                self.url.scheme = String::from("file");

                // Set url’s host to the empty string.
                self.url.host = Some(Host::Empty);

                let c = self.input.current();

                // If c is U+002F (/) or U+005C (\), then:
                if matches!(c, Some('/' | '\\')) {
                    // If c is U+005C (\), invalid-reverse-solidus validation error.
                    if c == Some('\\') {
                        self.validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    // Set state to file slash state.
                    self.set_state(URLParserState::FileSlash);
                }
                // Otherwise, if base is non-null and base’s scheme is "file":
                else if self.base.as_ref().is_some_and(|base| base.scheme == "file") {
                    let base = self
                        .base
                        .as_ref()
                        .expect("the previous step checks for a base");

                    // Set url’s host to base’s host,
                    self.url.host.clone_from(&base.host);

                    // url’s path to a clone of base’s path,
                    self.url.path.clone_from(&base.path);

                    // and url’s query to base’s query.
                    self.url.query.clone_from(&base.query);

                    // If c is U+003F (?)
                    if c == Some('?') {
                        // then set url’s query to the empty string
                        self.url.query = Some(String::new());

                        // and state to query state.
                        self.set_state(URLParserState::Query);
                    }
                    // Otherwise, if c is U+0023 (#)
                    else if c == Some('#') {
                        // set url’s fragment to the empty string
                        self.url.fragment = Some(String::new());

                        // and state to fragment state.
                        self.set_state(URLParserState::Fragment);
                    }
                    // Otherwise, if c is not the EOF code point:
                    else if c.is_some() {
                        // Set url’s query to null.
                        self.url.query = None;

                        // If the code point substring from pointer to the end of input
                        // does not start with a Windows drive letter,
                        if !util::starts_with_windows_drive_letter(self.input.from_current()) {
                            // then shorten url’s path.
                            self.url.shorten_path();
                        }
                        // Otherwise:
                        else {
                            // file-invalid-Windows-drive-letter validation error.
                            self.validation_error(
                                ValidationError::FileInvalidWindowsDriveLetter,
                            );

                            // Set url’s path to an empty list.
                            self.url.path = Path::default();
                        }

                        // Set state to path state
                        self.set_state(URLParserState::Path);

                        // and decrease pointer by 1.
                        self.input.go_back();
                    }
                }
                // Otherwise
                else {
                    // set state to path state,
                    self.set_state(URLParserState::Path);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#file-slash-state
            URLParserState::FileSlash => {
                let c = self.input.current();

                // If c is U+002F (/) or U+005C (\), then:
                if matches!(c, Some('/' | '\\')) {
                    // If c is U+005C (\), invalid-reverse-solidus validation error.
                    if c == Some('\\') {
                        self.validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    // Set state to file host state.
                    self.set_state(URLParserState::FileHost);
                }
                // Otherwise:
                else {
                    // If base is non-null and base’s scheme is "file", then:
                    if let Some(base) = &self.base {
                        if base.scheme == "file" {
                            // Set url’s host to base’s host.
                            self.url.host.clone_from(&base.host);

                            // If the code point substring from pointer to the end of input
                            // does not start with a Windows drive letter
                            // and base’s path[0] is a normalized Windows drive letter
                            if !util::starts_with_windows_drive_letter(self.input.from_current())
                                && base
                                    .path
                                    .first_segment()
                                    .is_some_and(util::is_normalized_windows_drive_letter)
                            {
                                // then append base’s path[0] to url’s path.
                                let drive_letter = base
                                    .path
                                    .first_segment()
                                    .expect("the previous step checks the first segment")
                                    .to_string();
                                self.url.path.push(drive_letter);
                            }
                        }
                    }

                    // Set state to path state,
                    self.set_state(URLParserState::Path);

                    // and decrease pointer by 1.
                    self.input.go_back();
                }
            },
            // https://url.spec.whatwg.org/#file-host-state
            URLParserState::FileHost => {
                match self.input.current() {
                    // If c is the EOF code point, U+002F (/), U+005C (\), U+003F (?), or U+0023 (#)
                    None | Some('/' | '\\' | '?' | '#') => {
                        // then decrease pointer by 1 and then:
                        self.input.go_back();

                        // If state override is not given and buffer is a Windows drive letter
                        if self.state_override.is_none()
                            && util::is_windows_drive_letter(&self.buffer)
                        {
                            // file-invalid-Windows-drive-letter-host validation error,
                            self.validation_error(
                                ValidationError::FileInvalidWindowsDriveLetterHost,
                            );

                            // set state to path state.
                            // (buffer is not reset and instead used in the path state)
                            self.set_state(URLParserState::Path);
                        }
                        // Otherwise, if buffer is the empty string, then:
                        else if self.buffer.is_empty() {
                            // Set url’s host to the empty string.
                            self.url.host = Some(Host::Empty);

                            // If state override is given, then return.
                            if self.state_override.is_some() {
                                return Ok(StepResult::Finish);
                            }

                            // Set state to path start state.
                            self.set_state(URLParserState::PathStart);
                        }
                        // Otherwise, run these steps:
                        else {
                            // Let host be the result of host parsing buffer with url is not special.
                            // If host is failure, then return failure.
                            let mut host = host::host_parse(
                                &self.buffer,
                                !self.url.is_special(),
                                &mut *self.error_handler,
                            )?;

                            // If host is "localhost", then set host to the empty string.
                            if matches!(&host, Host::Domain(domain) if domain == "localhost") {
                                host = Host::Empty;
                            }

                            // Set url’s host to host.
                            self.url.host = Some(host);

                            // If state override is given, then return.
                            if self.state_override.is_some() {
                                return Ok(StepResult::Finish);
                            }

                            // Set buffer to the empty string
                            self.buffer.clear();

                            // and state to path start state.
                            self.set_state(URLParserState::PathStart);
                        }
                    },
                    // Otherwise, append c to buffer.
                    Some(c) => self.buffer.push(c),
                }
            },
            // https://url.spec.whatwg.org/#path-start-state
            URLParserState::PathStart => {
                let c = self.input.current();

                // If url is special, then:
                if self.url.is_special() {
                    // If c is U+005C (\), invalid-reverse-solidus validation error.
                    if c == Some('\\') {
                        self.validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    // Set state to path state.
                    self.set_state(URLParserState::Path);

                    // If c is neither U+002F (/) nor U+005C (\)
                    if !matches!(c, Some('/' | '\\')) {
                        // then decrease pointer by 1.
                        self.input.go_back();
                    }
                }
                // Otherwise, if state override is not given and c is U+003F (?)
                else if self.state_override.is_none() && c == Some('?') {
                    // set url’s query to the empty string
                    self.url.query = Some(String::new());

                    // and state to query state.
                    self.set_state(URLParserState::Query);
                }
                // Otherwise, if state override is not given and c is U+0023 (#)
                else if self.state_override.is_none() && c == Some('#') {
                    // set url’s fragment to the empty string
                    self.url.fragment = Some(String::new());

                    // and state to fragment state.
                    self.set_state(URLParserState::Fragment);
                }
                // Otherwise, if c is not the EOF code point:
                else if c.is_some() {
                    // Set state to path state.
                    self.set_state(URLParserState::Path);

                    // If c is not U+002F (/),
                    if c != Some('/') {
                        // then decrease pointer by 1.
                        self.input.go_back();
                    }
                }
                // Otherwise, if state override is given and url’s host is null
                else if self.state_override.is_some() && self.url.host.is_none() {
                    // append the empty string to url’s path.
                    self.url.path.push(String::new());
                }
            },
            // https://url.spec.whatwg.org/#path-state
            URLParserState::Path => {
                let c = self.input.current();
                let is_special_backslash = self.url.is_special() && c == Some('\\');

                // If one of the following is true:
                // * c is the EOF code point or U+002F (/)
                // * url is special and c is U+005C (\)
                // * state override is not given and c is U+003F (?) or U+0023 (#)
                if matches!(c, None | Some('/'))
                    || is_special_backslash
                    || (self.state_override.is_none() && matches!(c, Some('?' | '#')))
                {
                    // If url is special and c is U+005C (\), invalid-reverse-solidus
                    // validation error.
                    if is_special_backslash {
                        self.validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    // If buffer is a double-dot path segment, then:
                    if util::is_double_dot_path_segment(&self.buffer) {
                        // Shorten url’s path.
                        self.url.shorten_path();

                        // If neither c is U+002F (/), nor url is special and c is U+005C (\)
                        if c != Some('/') && !is_special_backslash {
                            // append the empty string to url’s path.
                            self.url.path.push(String::new());
                        }
                    }
                    // Otherwise, if buffer is a single-dot path segment
                    // and if neither c is U+002F (/), nor url is special and c is U+005C (\)
                    else if util::is_single_dot_path_segment(&self.buffer)
                        && c != Some('/')
                        && !is_special_backslash
                    {
                        // append the empty string to url’s path.
                        self.url.path.push(String::new());
                    }
                    // Otherwise, if buffer is not a single-dot path segment, then:
                    else if !util::is_single_dot_path_segment(&self.buffer) {
                        // If url’s scheme is "file", url’s path is empty,
                        // and buffer is a Windows drive letter, then:
                        if self.url.scheme == "file"
                            && self.url.path.is_empty()
                            && util::is_windows_drive_letter(&self.buffer)
                        {
                            // If url’s host is neither the empty string nor null,
                            if !matches!(self.url.host, None | Some(Host::Empty)) {
                                // validation error.
                                self.validation_error(
                                    ValidationError::FileInvalidWindowsDriveLetter,
                                );

                                // Set url’s host to the empty string.
                                self.url.host = Some(Host::Empty);
                            }

                            // Replace the second code point in buffer with U+003A (:).
                            self.buffer.replace_range(1..2, ":");
                        }

                        // Append buffer to url’s path.
                        self.url.path.push(mem::take(&mut self.buffer));
                    }

                    // Set buffer to the empty string.
                    self.buffer.clear();

                    // If url’s scheme is "file", remove leading empty segments
                    // until at most one remains or the first one is non-empty.
                    if self.url.scheme == "file" {
                        self.url.path.trim_leading_empty_segments();
                    }

                    // If c is U+003F (?)
                    if c == Some('?') {
                        // then set url’s query to the empty string
                        self.url.query = Some(String::new());

                        // and state to query state.
                        self.set_state(URLParserState::Query);
                    }

                    // If c is U+0023 (#)
                    if c == Some('#') {
                        // then set url’s fragment to the empty string
                        self.url.fragment = Some(String::new());

                        // and state to fragment state.
                        self.set_state(URLParserState::Fragment);
                    }
                }
                // Otherwise, run these steps:
                else {
                    let c = c.expect("the previous step catches EOF code points");

                    // If c is not a URL code point and not U+0025 (%), validation error.
                    if c != '%' && !util::is_url_codepoint(c) {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // If c is U+0025 (%) and remaining does not start with
                    // two ASCII hex digits, validation error.
                    if c == '%'
                        && !util::starts_with_two_hex_digits(
                            self.input.remaining().iter().copied(),
                        )
                    {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // UTF-8 percent-encode c using the path percent-encode set
                    // and append the result to buffer.
                    let mut utf8_buffer = [0; 4];
                    let encoded_char = c.encode_utf8(&mut utf8_buffer);
                    percent_encode(
                        encoded_char.as_bytes(),
                        is_path_percent_encode_set,
                        &mut self.buffer,
                    );
                }
            },
            // https://url.spec.whatwg.org/#cannot-be-a-base-url-path-state
            URLParserState::OpaquePath => {
                let c = self.input.current();

                // If c is U+003F (?)
                if c == Some('?') {
                    // then set url’s query to the empty string
                    self.url.query = Some(String::new());

                    // and state to query state.
                    self.set_state(URLParserState::Query);
                }
                // Otherwise, if c is U+0023 (#)
                else if c == Some('#') {
                    // then set url’s fragment to the empty string
                    self.url.fragment = Some(String::new());

                    // and state to fragment state.
                    self.set_state(URLParserState::Fragment);
                }
                // Otherwise:
                else if let Some(c) = c {
                    // If c is not a URL code point and not U+0025 (%), validation error.
                    if c != '%' && !util::is_url_codepoint(c) {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // If c is U+0025 (%) and remaining does not start with
                    // two ASCII hex digits, validation error.
                    if c == '%'
                        && !util::starts_with_two_hex_digits(
                            self.input.remaining().iter().copied(),
                        )
                    {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // UTF-8 percent-encode c using the C0 control percent-encode set
                    // and append the result to url’s path.
                    let mut utf8_buffer = [0; 4];
                    let encoded_char = c.encode_utf8(&mut utf8_buffer);
                    percent_encode(
                        encoded_char.as_bytes(),
                        is_c0_percent_encode_set,
                        self.url.path.opaque_mut(),
                    );
                }
            },
            // https://url.spec.whatwg.org/#query-state
            URLParserState::Query => {
                // NOTE: A non-UTF-8 output encoding only ever applies to the
                // query of a special non-websocket scheme; this parser is
                // UTF-8 only, so the mandated reset to UTF-8 is a no-op.

                let c = self.input.current();

                // If one of the following is true:
                // * state override is not given and c is U+0023 (#)
                // * c is the EOF code point
                if c.is_none() || (self.state_override.is_none() && c == Some('#')) {
                    // Let queryPercentEncodeSet be the special-query percent-encode set
                    // if url is special; otherwise the query percent-encode set.
                    let query_percent_encode_set = if self.url.is_special() {
                        is_special_query_percent_encode_set
                    } else {
                        is_query_percent_encode_set
                    };

                    // Percent-encode after encoding, with encoding, buffer,
                    // and queryPercentEncodeSet, and append the result to url’s query.
                    let query = self.url.query.get_or_insert_default();
                    percent_encode(self.buffer.as_bytes(), query_percent_encode_set, query);

                    // Set buffer to the empty string.
                    self.buffer.clear();

                    // If c is U+0023 (#),
                    if c == Some('#') {
                        // then set url’s fragment to the empty string
                        self.url.fragment = Some(String::new());

                        // and state to fragment state.
                        self.set_state(URLParserState::Fragment);
                    }
                }
                // Otherwise, if c is not the EOF code point:
                else if let Some(c) = c {
                    // If c is not a URL code point and not U+0025 (%), validation error.
                    if c != '%' && !util::is_url_codepoint(c) {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // If c is U+0025 (%) and remaining does not start with
                    // two ASCII hex digits, validation error.
                    if c == '%'
                        && !util::starts_with_two_hex_digits(
                            self.input.remaining().iter().copied(),
                        )
                    {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // Append c to buffer.
                    self.buffer.push(c);
                }
            },
            // https://url.spec.whatwg.org/#fragment-state
            URLParserState::Fragment => {
                // If c is not the EOF code point, then:
                if let Some(c) = self.input.current() {
                    // If c is not a URL code point and not U+0025 (%), validation error.
                    // (This includes U+0000 NULL, which is kept regardless.)
                    if c != '%' && !util::is_url_codepoint(c) {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // If c is U+0025 (%) and remaining does not start with
                    // two ASCII hex digits, validation error.
                    if c == '%'
                        && !util::starts_with_two_hex_digits(
                            self.input.remaining().iter().copied(),
                        )
                    {
                        self.validation_error(ValidationError::InvalidURLUnit);
                    }

                    // UTF-8 percent-encode c using the fragment percent-encode set
                    // and append the result to url’s fragment.
                    let fragment = self.url.fragment.get_or_insert_default();

                    let mut utf8_buffer = [0; 4];
                    let encoded_char = c.encode_utf8(&mut utf8_buffer);
                    percent_encode(
                        encoded_char.as_bytes(),
                        is_fragment_percent_encode_set,
                        fragment,
                    );
                }
            },
        }
        Ok(StepResult::Continue)
    }
}

impl From<HostParseError> for Error {
    fn from(value: HostParseError) -> Self {
        Self::HostParse(value)
    }
}
