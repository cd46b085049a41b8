//! The navigation bar shown at the top of every page (and at the bottom on small screens).

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
    /// Whether the link is shown directly in the mobile bottom bar rather than
    /// in the "More" menu.
    is_primary: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let link = |url, title, is_primary| Link {
            url,
            title,
            is_current: active_endpoint == url,
            is_primary,
        };

        let links = vec![
            link(endpoints::DASHBOARD_VIEW, "Dashboard", true),
            link(endpoints::TRANSACTIONS_VIEW, "Transactions", true),
            link(endpoints::RECURRING_VIEW, "Recurring", true),
            link(endpoints::CATEGORIES_VIEW, "Categories", false),
            link(endpoints::REPORTS_VIEW, "Reports", false),
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
                is_primary: false,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let more_is_active = links
            .iter()
            .any(|link| !link.is_primary && link.is_current);
        let bottom_link_class = |is_current: bool| -> &'static str {
            if is_current {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
                text-blue-700 shadow-sm sm:px-4 sm:text-sm \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
                sm:px-4 sm:text-sm \
                hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
                dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
            }
        };
        let more_item_class = |is_current: bool| -> &'static str {
            if is_current {
                "block rounded-lg bg-blue-50 px-3 py-2 text-blue-700 \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
                hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 \
                dark:hover:text-blue-200"
            }
        };

        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href="/"
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        img src="/static/favicon.svg" alt="Pharmacy Ledger Logo" class="h-8";

                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Pharmacy Ledger"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone().into_iter() {
                                li { (link.into_desktop_html()) }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-4 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Primary"
                        {
                            @for link in links.iter().filter(|link| link.is_primary) {
                                li class="min-w-0" {
                                    a
                                        href=(link.url)
                                        class=(bottom_link_class(link.is_current))
                                        aria-current=[link.is_current.then_some("page")]
                                    {
                                        span class="truncate" { (link.title) }
                                    }
                                }
                            }

                            li class="min-w-0" {
                                details class="group relative"
                                {
                                    summary
                                        class={
                                            "list-none [&::-webkit-details-marker]:hidden cursor-pointer "
                                            (bottom_link_class(more_is_active))
                                        }
                                        aria-current=[more_is_active.then_some("page")]
                                    {
                                        span class="truncate" { "More" }
                                    }

                                    div
                                        class="absolute bottom-full right-0 mb-3 w-40 rounded-xl
                                        border border-gray-200 bg-white/95 p-2 shadow-xl
                                        backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                                    {
                                        ul class="flex flex-col gap-1 text-sm font-medium"
                                        {
                                            @for link in links.iter().filter(|link| !link.is_primary) {
                                                li {
                                                    a
                                                        href=(link.url)
                                                        class=(more_item_class(link.is_current))
                                                        aria-current=[link.is_current.then_some("page")]
                                                    {
                                                        (link.title)
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn set_active_endpoint() {
        let cases = [
            (endpoints::DASHBOARD_VIEW, true),
            (endpoints::TRANSACTIONS_VIEW, true),
            (endpoints::RECURRING_VIEW, true),
            (endpoints::CATEGORIES_VIEW, true),
            (endpoints::REPORTS_VIEW, true),
            (endpoints::ROOT, false),
            (endpoints::NEW_RECURRING_VIEW, false),
            (endpoints::INTERNAL_ERROR_VIEW, false),
            (endpoints::LOG_IN_API, false),
            (endpoints::LOG_IN_VIEW, false),
            (endpoints::LOG_OUT, false),
            (endpoints::REGISTER_VIEW, false),
            (endpoints::TRANSACTIONS_API, false),
        ];

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint);

            assert_link_active(nav_bar, endpoint, should_be_active);
        }
    }

    #[test]
    fn more_menu_holds_secondary_links() {
        let nav_bar = NavBar::new(endpoints::REPORTS_VIEW);

        let secondary: Vec<_> = nav_bar
            .links
            .iter()
            .filter(|link| !link.is_primary)
            .map(|link| link.url)
            .collect();

        assert_eq!(
            secondary,
            [
                endpoints::CATEGORIES_VIEW,
                endpoints::REPORTS_VIEW,
                endpoints::LOG_OUT
            ]
        );
    }

    #[track_caller]
    fn assert_link_active(nav_bar: NavBar<'_>, endpoint: &str, should_be_active: bool) {
        for link in nav_bar.links {
            if link.url == endpoint {
                assert_eq!(
                    link.is_current, should_be_active,
                    "Link for {endpoint} should have is_current={should_be_active}"
                );
            } else {
                assert!(
                    !link.is_current,
                    "Link for {} should be inactive while on {endpoint}",
                    link.url
                );
            }
        }
    }
}
