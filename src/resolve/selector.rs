//! Framework dependency set selection

use crate::domain::{DependencySetDescriptor, FrameworkFamily, TargetFramework};

/// Pick the dependency set a package contributes to a consuming framework.
///
/// A package publishing a single set always contributes it. Otherwise the
/// family preference is asymmetric:
/// - Modern consumers take the `.NETStandard` set
/// - Abstraction consumers take the `.NETCoreApp` set
/// - Legacy consumers take an unscoped or `.NETFramework` set
///
/// The first match in declaration order wins. `None` means the package adds
/// nothing to the closure.
pub fn select_dependency_set<'a>(
    descriptors: &'a [DependencySetDescriptor],
    consumer: &TargetFramework,
) -> Option<&'a DependencySetDescriptor> {
    if let [only] = descriptors {
        return Some(only);
    }

    let consumer_family = consumer.family();
    descriptors
        .iter()
        .find(|set| accepts(consumer_family, set.family()))
}

fn accepts(consumer: FrameworkFamily, descriptor: Option<FrameworkFamily>) -> bool {
    match consumer {
        FrameworkFamily::Modern => descriptor == Some(FrameworkFamily::Abstraction),
        FrameworkFamily::Abstraction => descriptor == Some(FrameworkFamily::Modern),
        FrameworkFamily::Legacy => matches!(descriptor, None | Some(FrameworkFamily::Legacy)),
    }
}
