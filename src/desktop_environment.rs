use std::env;
use std::ffi::OsString;

/// Setting value that asks for the running desktop to be detected.
pub const AUTO: &str = "Auto";

/// Desktop environment identifiers that `OnlyShowIn`/`NotShowIn` are matched
/// against.
///
/// A setting of exactly `["Auto"]` reads `XDG_CURRENT_DESKTOP`, which may name
/// several desktops separated by `:`. Any other setting is used as is.
pub fn resolve(setting: &[String]) -> Vec<String> {
    resolve_with_env(setting, &|name| env::var_os(name))
}

pub(crate) fn resolve_with_env<T: ?Sized>(setting: &[String], env_var: &T) -> Vec<String>
where
    T: Fn(&str) -> Option<OsString>,
{
    if setting.len() != 1 || setting[0] != AUTO {
        return setting.to_vec();
    }
    env_var("XDG_CURRENT_DESKTOP")
        .map(|desktops| {
            desktops
                .to_string_lossy()
                .split(':')
                .filter(|desktop| !desktop.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_env(vars: Vec<(&'static str, &'static str)>) -> Box<dyn Fn(&str) -> Option<OsString>> {
        Box::new(move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(value))
        })
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_auto_reads_current_desktop() {
        let env = make_env(vec![("XDG_CURRENT_DESKTOP", "LXDE")]);
        assert_eq!(resolve_with_env(&strings(&[AUTO]), &*env), ["LXDE"]);
    }

    #[test]
    fn test_auto_splits_desktop_list() {
        let env = make_env(vec![("XDG_CURRENT_DESKTOP", "ubuntu:GNOME")]);
        assert_eq!(resolve_with_env(&strings(&[AUTO]), &*env), ["ubuntu", "GNOME"]);
    }

    #[test]
    fn test_auto_without_desktop() {
        let env = make_env(vec![]);
        assert!(resolve_with_env(&strings(&[AUTO]), &*env).is_empty());
    }

    #[test]
    fn test_override_is_used_verbatim() {
        let env = make_env(vec![("XDG_CURRENT_DESKTOP", "GNOME")]);
        assert_eq!(
            resolve_with_env(&strings(&["LXDE", "XFCE"]), &*env),
            ["LXDE", "XFCE"]
        );
        // "Auto" is only special on its own.
        assert_eq!(
            resolve_with_env(&strings(&[AUTO, "XFCE"]), &*env),
            [AUTO, "XFCE"]
        );
    }
}
