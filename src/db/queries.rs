//! SQL query constants
//!
//! Contains all SQL queries used by the record-management handlers.

/// List employees with their user, department and grade names
pub const LIST_EMPLOYEES: &str = r#"
    SELECT
        e.Employee_Id,
        u.User_Name,
        d.Dept_Name,
        g.Grade_Name,
        e.Hire_Date
    FROM Employee e
    INNER JOIN Users u ON e.User_Id = u.User_Id
    INNER JOIN Department d ON e.Dept_Id = d.Dept_Id
    INNER JOIN Grade g ON e.Grade_Id = g.Grade_Id
    ORDER BY e.Employee_Id ASC
"#;

/// Insert an employee and return the stored row
pub const INSERT_EMPLOYEE: &str = r#"
    INSERT INTO Employee (User_Id, Dept_Id, Grade_Id, Hire_Date)
    VALUES ($1, $2, $3, $4)
    RETURNING Employee_Id, User_Id, Dept_Id, Grade_Id, Hire_Date
"#;

pub const UPDATE_EMPLOYEE: &str = r#"
    UPDATE Employee
    SET User_Id = $1, Dept_Id = $2, Grade_Id = $3, Hire_Date = $4
    WHERE Employee_Id = $5
"#;

/// One employee with joined names, shaped like LIST_EMPLOYEES
pub const GET_EMPLOYEE_DETAIL: &str = r#"
    SELECT
        e.Employee_Id,
        u.User_Name,
        d.Dept_Name,
        g.Grade_Name,
        e.Hire_Date
    FROM Employee e
    INNER JOIN Users u ON e.User_Id = u.User_Id
    INNER JOIN Department d ON e.Dept_Id = d.Dept_Id
    INNER JOIN Grade g ON e.Grade_Id = g.Grade_Id
    WHERE e.Employee_Id = $1
"#;

pub const DELETE_EMPLOYEE: &str = r#"
    DELETE FROM Employee WHERE Employee_Id = $1
"#;

/// Department dropdown feed
pub const LIST_DEPARTMENT_OPTIONS: &str = r#"
    SELECT Dept_Id, Dept_Name
    FROM Department
    ORDER BY Dept_Name ASC
"#;

/// Grade dropdown feed
pub const LIST_GRADE_OPTIONS: &str = r#"
    SELECT Grade_Id, Grade_Name, Basic_Salary, Grade_Bonus
    FROM Grade
    ORDER BY Grade_Name ASC
"#;

/// Accounts with the employee role, for linking a new employee record
pub const LIST_EMPLOYEE_ROLE_USERS: &str = r#"
    SELECT User_Id, User_Name, E_mail
    FROM Users
    WHERE Role = 'employee'
    ORDER BY User_Name ASC
"#;

/// Departments with their headcount
pub const LIST_DEPARTMENTS_WITH_COUNTS: &str = r#"
    SELECT
        d.Dept_Id,
        d.Dept_Name,
        COUNT(e.Employee_Id) AS Total_Employees
    FROM Department d
    LEFT JOIN Employee e ON e.Dept_Id = d.Dept_Id
    GROUP BY d.Dept_Id, d.Dept_Name
    ORDER BY d.Dept_Id ASC
"#;

pub const GET_DEPARTMENT_WITH_COUNT: &str = r#"
    SELECT
        d.Dept_Id,
        d.Dept_Name,
        COUNT(e.Employee_Id) AS Total_Employees
    FROM Department d
    LEFT JOIN Employee e ON e.Dept_Id = d.Dept_Id
    WHERE d.Dept_Id = $1
    GROUP BY d.Dept_Id, d.Dept_Name
"#;

pub const INSERT_DEPARTMENT: &str = r#"
    INSERT INTO Department (Dept_Name)
    VALUES ($1)
    RETURNING Dept_Id
"#;

pub const UPDATE_DEPARTMENT: &str = r#"
    UPDATE Department SET Dept_Name = $1 WHERE Dept_Id = $2
"#;

pub const DELETE_DEPARTMENT: &str = r#"
    DELETE FROM Department WHERE Dept_Id = $1
"#;

pub const COUNT_EMPLOYEES_IN_DEPARTMENT: &str = r#"
    SELECT COUNT(*) FROM Employee WHERE Dept_Id = $1
"#;

/// Grades with how many employees hold each
pub const LIST_GRADES_WITH_COUNTS: &str = r#"
    SELECT
        g.Grade_Id,
        g.Grade_Name,
        g.Basic_Salary,
        g.Grade_Bonus,
        COUNT(e.Employee_Id) AS Employee_Count
    FROM Grade g
    LEFT JOIN Employee e ON e.Grade_Id = g.Grade_Id
    GROUP BY g.Grade_Id, g.Grade_Name, g.Basic_Salary, g.Grade_Bonus
    ORDER BY g.Grade_Id ASC
"#;

pub const GET_GRADE: &str = r#"
    SELECT Grade_Id, Grade_Name, Basic_Salary, Grade_Bonus
    FROM Grade
    WHERE Grade_Id = $1
"#;

/// Employees holding a grade, with their account name and email
pub const GET_GRADE_EMPLOYEES: &str = r#"
    SELECT e.Employee_Id, u.User_Name, u.E_mail
    FROM Employee e
    INNER JOIN Users u ON e.User_Id = u.User_Id
    WHERE e.Grade_Id = $1
    ORDER BY e.Employee_Id ASC
"#;

pub const INSERT_GRADE: &str = r#"
    INSERT INTO Grade (Grade_Name, Basic_Salary, Grade_Bonus)
    VALUES ($1, $2, $3)
    RETURNING Grade_Id, Grade_Name, Basic_Salary, Grade_Bonus
"#;

pub const UPDATE_GRADE: &str = r#"
    UPDATE Grade
    SET Grade_Name = $1, Basic_Salary = $2, Grade_Bonus = $3
    WHERE Grade_Id = $4
    RETURNING Grade_Id, Grade_Name, Basic_Salary, Grade_Bonus
"#;

pub const DELETE_GRADE: &str = r#"
    DELETE FROM Grade WHERE Grade_Id = $1
"#;

pub const COUNT_EMPLOYEES_IN_GRADE: &str = r#"
    SELECT COUNT(*) FROM Employee WHERE Grade_Id = $1
"#;

/// Salary records with the employee's account name
pub const LIST_SALARIES: &str = r#"
    SELECT s.Salary_Id, u.User_Name, s.Salary, s.Salary_Date
    FROM Salary s
    INNER JOIN Employee e ON s.Employee_Id = e.Employee_Id
    INNER JOIN Users u ON e.User_Id = u.User_Id
    ORDER BY s.Salary_Id ASC
"#;

/// Employee dropdown feed for the salary form
pub const LIST_SALARY_EMPLOYEES: &str = r#"
    SELECT e.Employee_Id, u.User_Name
    FROM Employee e
    INNER JOIN Users u ON e.User_Id = u.User_Id
    ORDER BY u.User_Name ASC
"#;

/// First account matching a display name
pub const FIND_USER_ID_BY_NAME: &str = r#"
    SELECT User_Id FROM Users WHERE User_Name = $1 LIMIT 1
"#;

/// Employee row linked to an account
pub const FIND_EMPLOYEE_ID_BY_USER_ID: &str = r#"
    SELECT Employee_Id FROM Employee WHERE User_Id = $1 LIMIT 1
"#;

pub const INSERT_SALARY: &str = r#"
    INSERT INTO Salary (Employee_Id, Salary, Salary_Date)
    VALUES ($1, $2, $3)
    RETURNING Salary_Id
"#;

pub const UPDATE_SALARY: &str = r#"
    UPDATE Salary
    SET Employee_Id = $1, Salary = $2, Salary_Date = $3
    WHERE Salary_Id = $4
    RETURNING Salary_Id
"#;

pub const DELETE_SALARY: &str = r#"
    DELETE FROM Salary WHERE Salary_Id = $1
"#;

// Dashboard aggregates

pub const COUNT_USERS: &str = "SELECT COUNT(*) FROM Users";
pub const COUNT_EMPLOYEES: &str = "SELECT COUNT(*) FROM Employee";
pub const COUNT_DEPARTMENTS: &str = "SELECT COUNT(*) FROM Department";

pub const SUM_SALARIES: &str = r#"
    SELECT COALESCE(SUM(Salary), 0) FROM Salary
"#;

/// Total salary paid per department, zero for departments without payouts
pub const SALARIES_BY_DEPARTMENT: &str = r#"
    SELECT d.Dept_Name, COALESCE(SUM(s.Salary), 0) AS total
    FROM Department d
    LEFT JOIN Employee e ON e.Dept_Id = d.Dept_Id
    LEFT JOIN Salary s ON s.Employee_Id = e.Employee_Id
    GROUP BY d.Dept_Name
    ORDER BY d.Dept_Name ASC
"#;

/// Headcount per grade
pub const EMPLOYEES_BY_GRADE: &str = r#"
    SELECT g.Grade_Name, COUNT(e.Employee_Id) AS total
    FROM Grade g
    LEFT JOIN Employee e ON e.Grade_Id = g.Grade_Id
    GROUP BY g.Grade_Name
    ORDER BY g.Grade_Name ASC
"#;
